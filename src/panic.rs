//! Panic capture for test code.
//!
//! Test bodies, `expect_throws` blocks and `expect_failure` blocks run inside [`guarded`] regions. A process-wide
//! panic hook, installed once, records the panic location for the current thread while it is inside such a region
//! and stays silent there; outside of them it defers to whatever hook was installed before.
//!
//! [`end_body`] stops a test body from anywhere inside it. It unwinds without running the hook, passes through
//! nested regions, and is absorbed by the runner's region around the body.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::raised::{Origin, Raised};

thread_local! {
    /// Nesting depth of guarded regions on this thread.
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
    /// Location of the most recent panic inside a guarded region.
    static LAST_ORIGIN: Cell<Option<Origin>> = const { Cell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let guarded = GUARD_DEPTH.try_with(Cell::get).unwrap_or(0) > 0;
            if guarded {
                let origin = info.location().map(Origin::from);
                let _ = LAST_ORIGIN.try_with(|last| last.set(origin));
            } else {
                previous(info);
            }
        }));
    });
}

/// How a guarded region exited early.
#[derive(Debug)]
pub(crate) enum Escape {
    /// An error or panic left the region.
    Raised(Raised),
    /// The test body was ended on purpose after its outcome was already recorded.
    Ended,
}

/// Unwind payload used by [`end_body`].
struct BodyEnded;

/// Stop the running test body. The runner's region recognizes the unwind and records nothing for it.
pub(crate) fn end_body() -> ! {
    panic::resume_unwind(Box::new(BodyEnded))
}

/// Run `body` inside a guarded region, converting a panic into a [`Raised`] of the `panic` kind.
///
/// The outcome of a body that returns normally is passed through untouched.
pub(crate) fn guarded<F>(body: F) -> Result<(), Escape>
where
    F: FnOnce() -> Result<(), Raised>,
{
    install_hook();

    GUARD_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(body));
    GUARD_DEPTH.with(|depth| depth.set(depth.get() - 1));

    match result {
        Ok(outcome) => outcome.map_err(Escape::Raised),
        Err(payload) if payload.is::<BodyEnded>() => Err(Escape::Ended),
        Err(payload) => {
            let origin = LAST_ORIGIN.with(Cell::take);
            Err(Escape::Raised(Raised::from_panic(
                payload_message(payload.as_ref()),
                origin,
            )))
        }
    }
}

/// Like [`guarded`] for regions nested inside a test body: an ended body keeps unwinding.
pub(crate) fn catch<F>(body: F) -> Result<(), Raised>
where
    F: FnOnce() -> Result<(), Raised>,
{
    match guarded(body) {
        Ok(()) => Ok(()),
        Err(Escape::Raised(raised)) => Err(raised),
        Err(Escape::Ended) => end_body(),
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(message) = payload.downcast_ref::<&str>() {
        Some((*message).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}
