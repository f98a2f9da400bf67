//! Cooperative coroutine scheduler
//!
//! Everything in the framework runs on one logical thread driven by the host's frame
//! loop. Long-running work (the panel loader, the destroy sweep, deferred async-load
//! hooks) is written as `async` blocks and started on the [`Scheduler`]. A coroutine
//! runs synchronously up to its first suspension point when it is started, then
//! resumes at most once per [`Scheduler::tick`].
//!
//! Suspension points:
//! - [`SchedulerHandle::next_frame`] resumes on the next tick
//! - [`SchedulerHandle::wait_for`] resumes once the scheduler clock has advanced

use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::noop_waker_ref;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

type Coroutine = LocalBoxFuture<'static, ()>;

#[derive(Default)]
struct Shared {
    now: Cell<f64>,
    frame: Cell<u64>,
    incoming: RefCell<Vec<Coroutine>>,
}

/// Cheap, clonable handle used to start coroutines and build suspension points
#[derive(Clone, Default)]
pub struct SchedulerHandle {
    shared: Rc<Shared>,
}

impl SchedulerHandle {
    /// Starts a coroutine
    ///
    /// The coroutine is polled immediately; if it suspends, it is queued and resumed
    /// from the next tick on.
    ///
    /// # Returns
    /// `true` if the coroutine finished without suspending
    pub fn start_coroutine(&self, coroutine: impl Future<Output = ()> + 'static) -> bool {
        let mut coroutine = coroutine.boxed_local();
        let mut cx = Context::from_waker(noop_waker_ref());
        match coroutine.as_mut().poll(&mut cx) {
            Poll::Ready(()) => true,
            Poll::Pending => {
                self.shared.incoming.borrow_mut().push(coroutine);
                false
            }
        }
    }

    /// Scheduler clock, in the same unit as the deltas passed to [`Scheduler::tick`]
    pub fn now(&self) -> f64 {
        self.shared.now.get()
    }

    /// Number of ticks run so far
    pub fn frame(&self) -> u64 {
        self.shared.frame.get()
    }

    /// Suspension point that resumes on the next tick
    pub fn next_frame(&self) -> NextFrame {
        NextFrame { yielded: false }
    }

    /// Suspension point that resumes once `seconds` have elapsed on the scheduler clock
    ///
    /// The wait starts when the future is first polled.
    pub fn wait_for(&self, seconds: f32) -> WaitFor {
        WaitFor {
            shared: Rc::clone(&self.shared),
            seconds: f64::from(seconds),
            deadline: None,
        }
    }
}

/// Future returned by [`SchedulerHandle::next_frame`]
#[derive(Debug)]
pub struct NextFrame {
    yielded: bool,
}

impl Future for NextFrame {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            Poll::Pending
        }
    }
}

/// Future returned by [`SchedulerHandle::wait_for`]
pub struct WaitFor {
    shared: Rc<Shared>,
    seconds: f64,
    deadline: Option<f64>,
}

impl Future for WaitFor {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        let now = this.shared.now.get();
        let deadline = *this.deadline.get_or_insert(now + this.seconds);
        // Clock deltas are summed as floats; tolerate rounding at the boundary.
        if now + 1e-9 >= deadline {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

/// Owner of all suspended coroutines
#[derive(Default)]
pub struct Scheduler {
    handle: SchedulerHandle,
    running: Vec<Coroutine>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Advances the clock by `delta` and resumes every suspended coroutine once
    ///
    /// Coroutines started while this tick runs are first resumed on the next tick.
    ///
    /// # Returns
    /// Number of coroutines still suspended
    pub fn tick(&mut self, delta: f32) -> usize {
        let shared = &self.handle.shared;
        shared.now.set(shared.now.get() + f64::from(delta.max(0.0)));
        shared.frame.set(shared.frame.get() + 1);

        self.running.append(&mut shared.incoming.borrow_mut());
        let mut cx = Context::from_waker(noop_waker_ref());
        let mut suspended = Vec::with_capacity(self.running.len());
        for mut coroutine in std::mem::take(&mut self.running) {
            if coroutine.as_mut().poll(&mut cx).is_pending() {
                suspended.push(coroutine);
            }
        }
        self.running = suspended;
        self.len()
    }

    /// Number of suspended coroutines, including ones started since the last tick
    pub fn len(&self) -> usize {
        self.running.len() + self.handle.shared.incoming.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every suspended coroutine
    pub fn stop_all(&mut self) {
        self.running.clear();
        self.handle.shared.incoming.borrow_mut().clear();
    }
}
