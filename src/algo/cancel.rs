/*!
# Cooperative Cancellation

Traversals poll a [`Cancellation`] token once per loop iteration and never interrupt
themselves otherwise. When the token reports cancellation, the vertex currently being
explored is finished and the walk stops; vertices further up the DFS stack (or still
queued in BFS) are left open.

Tokens are polled through a shared reference, so the common choices are
- [`NeverCancel`] (the default, optimized away entirely),
- `&Cell<bool>` when the handler itself decides to stop,
- `&AtomicBool` when another thread does.
*/

use std::{
    cell::Cell,
    sync::atomic::{AtomicBool, Ordering},
};

/// Polled by traversals to decide whether to stop early.
pub trait Cancellation {
    /// Returns *true* if the traversal should stop
    fn is_cancelled(&self) -> bool;
}

/// Token that never cancels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    #[inline(always)]
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancellation for Cell<bool> {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.get()
    }
}

impl Cancellation for AtomicBool {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<C> Cancellation for &C
where
    C: Cancellation + ?Sized,
{
    #[inline]
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// How an eager traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every vertex reachable from the sources was finished
    Completed,
    /// The cancellation token stopped the walk
    Cancelled,
}

impl Outcome {
    /// Returns *true* if the walk was stopped by its cancellation token
    pub fn is_cancelled(self) -> bool {
        self == Outcome::Cancelled
    }
}

/// Logs the stop; shared by all traversals.
pub(crate) fn log_cancellation(algorithm: &'static str) -> Outcome {
    tracing::debug!(algorithm, "traversal cancelled");
    Outcome::Cancelled
}
