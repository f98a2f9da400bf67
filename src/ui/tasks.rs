//! Coroutines driving the registry
//!
//! Each task holds only a weak handle to the stage and borrows it between
//! suspension points, never across one.

use log::{debug, error, info};
use std::cell::RefCell;
use std::rc::Weak;

use super::panel::PanelType;
use crate::app::Stage;
use crate::gfx::scene::SurfaceId;
use crate::runtime::SchedulerHandle;

/// Drains the pending-open stack, then yields once
///
/// Every freshly loaded panel gets its async-load hook scheduled for the next tick.
pub(crate) async fn load_panels(stage: Weak<RefCell<Stage>>, scheduler: SchedulerHandle) {
    let pass = {
        let Some(strong) = stage.upgrade() else {
            return;
        };
        let mut guard = strong.borrow_mut();
        let pass = guard.with_ui(|ui, host| ui.load_pending_pass(host));
        pass
    };

    match pass {
        Ok(Ok(loaded)) => {
            for (kind, surface) in loaded {
                scheduler.start_coroutine(async_load(
                    stage.clone(),
                    scheduler.clone(),
                    kind,
                    surface,
                ));
            }
        }
        Ok(Err(err)) => debug!("load pass stopped early: {err}"),
        Err(err) => error!("panel registry unavailable: {err}"),
    }

    scheduler.next_frame().await;
}

/// Runs a panel's async-load hook one tick after it was loaded
async fn async_load(
    stage: Weak<RefCell<Stage>>,
    scheduler: SchedulerHandle,
    kind: PanelType,
    surface: SurfaceId,
) {
    scheduler.next_frame().await;

    let Some(strong) = stage.upgrade() else {
        return;
    };
    let mut guard = strong.borrow_mut();
    match guard.with_ui(|ui, host| ui.run_async_load(&kind, surface, host)) {
        Ok(true) => {}
        Ok(false) => debug!("skipped async load of {}: panel inactive or gone", kind.name()),
        Err(err) => error!("panel registry unavailable: {err}"),
    }
}

/// Periodic deferred-destroy sweep
///
/// Ages hidden panels by `interval` every `interval` time units. Ends when the
/// stage is dropped.
pub(crate) async fn check_destroy_panels(
    stage: Weak<RefCell<Stage>>,
    scheduler: SchedulerHandle,
    interval: f32,
) {
    let interval = interval.max(f32::EPSILON);
    info!("panel destroy sweep started, every {interval}s");
    loop {
        scheduler.wait_for(interval).await;

        let Some(strong) = stage.upgrade() else {
            break;
        };
        let mut guard = strong.borrow_mut();
        match guard.with_ui(|ui, host| ui.check_destroy_panels(interval, host.scene)) {
            Ok(destroyed) if !destroyed.is_empty() => {
                debug!("sweep destroyed {} panel(s)", destroyed.len());
            }
            Ok(_) => {}
            Err(err) => error!("panel registry unavailable: {err}"),
        }
        drop(guard);
    }
}
