//! Login Flow Demo
//!
//! Drives a login screen headless: the login panel is pinned open and wires its
//! buttons on awake, the register panel slides in and out with a combined
//! move/scale/rotate tween, and the scene finally changes behind the player's back.
//!
//! Run with `RUST_LOG=debug cargo run --example login_flow` to follow the registry.

use anyhow::{anyhow, Result};
use cgmath::{Vector2, Vector3};
use log::info;
use perak::prelude::*;
use perak::ui::PointerEventData;
use std::any::Any;

const FRAME: f32 = 1.0 / 60.0;

#[derive(Default)]
struct LoginPanel {
    core: PanelCore,
}

impl Panel for LoginPanel {
    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }

    fn awake(&mut self, ctx: &mut PanelContext<'_>) {
        ctx.audio.play_sound(PlayMusic::StartScene);
        self.core.ignore_hide_guard = true;

        if let Some(login) = ctx.scene.find_path(ctx.surface, "GameObject/Btns/LoginBtn") {
            ctx.listeners.get(login).add_listener(
                TouchType::OnClick,
                |_, _, args| {
                    let user = args.get::<&str>(0).copied().unwrap_or("guest");
                    info!("login requested for {user}");
                },
                Args::new().with("player-one"),
            );
        }
        if let Some(register) = ctx.scene.find_path(ctx.surface, "GameObject/Btns/RegisterBtn") {
            let commands = ctx.commands.clone();
            ctx.listeners.get(register).add_listener(
                TouchType::OnClick,
                move |_, _, _| commands.open_panel::<RegisterPanel>(Args::new()),
                Args::new(),
            );
        }
    }

    fn on_async_load(&mut self, ctx: &mut PanelContext<'_>) {
        ctx.commands.hide_panel::<RegisterPanel>();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct RegisterPanel {
    core: PanelCore,
}

impl Default for RegisterPanel {
    fn default() -> Self {
        let mut tween = TweenSettings::default()
            .with_kind(TweenKind::LocalMoveAndScaleAndRotate)
            .with_ease(Ease::OutBack);
        tween.local_move_end = Vector3::new(-1000.0, 0.0, 0.0);
        tween.scale_end = Vector3::new(0.0, 0.0, 0.0);
        Self {
            core: PanelCore::default()
                .with_tween(tween)
                .with_sounds(PlayMusic::ButtonClick, PlayMusic::None),
        }
    }
}

impl Panel for RegisterPanel {
    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }

    fn awake(&mut self, ctx: &mut PanelContext<'_>) {
        if let Some(close) = ctx.scene.find_path(ctx.surface, "CloseBtn") {
            let commands = ctx.commands.clone();
            ctx.listeners.get(close).add_listener(
                TouchType::OnClick,
                move |_, _, _| commands.hide_panel::<RegisterPanel>(),
                Args::new(),
            );
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn resources() -> ResourceTable {
    let buttons = Template::new("Btns")
        .with_child(Template::new("LoginBtn"))
        .with_child(Template::new("RegisterBtn"));
    ResourceTable::new()
        .with(
            "Prefabs/UI/LoginPanel",
            Template::new("LoginPanel").with_child(Template::new("GameObject").with_child(buttons)),
        )
        .with(
            "Prefabs/UI/RegisterPanel",
            Template::new("RegisterPanel").with_child(Template::new("CloseBtn")),
        )
}

fn run_frames(app: &mut PerakApp, frames: usize) -> Result<()> {
    for _ in 0..frames {
        app.tick(FRAME)?;
    }
    Ok(())
}

fn button(app: &PerakApp, panel: SurfaceId, path: &str) -> Result<SurfaceId> {
    app.stage()
        .scene()
        .find_path(panel, path)
        .ok_or_else(|| anyhow!("missing button {path}"))
}

fn click() -> InputEvent {
    InputEvent::Click(PointerEventData::click(Vector2::new(0.0, 0.0), 1))
}

fn main() -> Result<()> {
    perak::init_logging();

    let mut app = PerakApp::new(FrameworkConfig::from_env(), resources())?;
    app.open_panel::<LoginPanel>(Args::new())?;
    run_frames(&mut app, 2)?;

    let login = app
        .surface_of::<LoginPanel>()
        .ok_or_else(|| anyhow!("login panel did not load"))?;
    app.dispatch(button(&app, login, "GameObject/Btns/LoginBtn")?, &click())?;
    app.dispatch(button(&app, login, "GameObject/Btns/RegisterBtn")?, &click())?;
    info!("register panel: {:?}", app.panel_state::<RegisterPanel>());

    run_frames(&mut app, 30)?;
    info!("register panel: {:?}", app.panel_state::<RegisterPanel>());

    let register = app
        .surface_of::<RegisterPanel>()
        .ok_or_else(|| anyhow!("register panel did not load"))?;
    app.dispatch(button(&app, register, "CloseBtn")?, &click())?;
    run_frames(&mut app, 30)?;
    info!("register panel: {:?}", app.panel_state::<RegisterPanel>());

    // Hidden panels age out on the sweep.
    run_frames(&mut app, 60 * 16)?;
    info!("register resident after idling: {}", app.is_resident::<RegisterPanel>());

    app.load_scene(None, "Lobby")?;
    info!("login resident after scene load: {}", app.is_resident::<LoginPanel>());
    app.shutdown();
    Ok(())
}
