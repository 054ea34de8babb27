//! Forcing a view into a display mode and putting it back afterwards.
use std::future::Future;
use std::time::Duration;

use printer_logging::{printer_debug, printer_error};
use tokio::time;

use crate::error::HostError;
use crate::host::RenderedView;
use crate::types::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// A single transition; no-op when the view is already in the target mode.
    Direct,
    /// When the view is already in the target mode, go to the opposite mode and back so
    /// the host rebuilds its output. Needed for hosts that reuse stale render output.
    ForceRefresh { toggle_delay: Duration },
}

/// Proof that a view was moved out of its original mode.
///
/// Consume it with [`ModeRestore::restore`] on every exit path; [`with_mode`] does so.
#[must_use = "the view stays in the forced mode until the token is restored"]
#[derive(Debug)]
pub struct ModeRestore {
    original: ViewMode,
    consumed: bool,
}

impl ModeRestore {
    fn new(original: ViewMode) -> Self {
        Self {
            original,
            consumed: false,
        }
    }

    pub fn original(&self) -> ViewMode {
        self.original
    }

    /// Puts the view back into its original mode and asks the host to rebuild it.
    /// Restore failures are logged, never propagated.
    pub async fn restore(mut self, view: &dyn RenderedView) {
        self.consumed = true;
        if view.mode() != self.original {
            printer_debug!("restoring view to {} mode", self.original);
            if let Err(err) = view.set_mode(self.original).await {
                printer_error!("failed to restore view to {} mode: {}", self.original, err);
            }
        }
        view.rebuild();
    }
}

impl Drop for ModeRestore {
    fn drop(&mut self) {
        if !self.consumed {
            printer_error!(
                "mode restore token dropped without restoring {} mode",
                self.original
            );
        }
    }
}

/// Moves `view` into `target` and returns the token that undoes it.
///
/// A failing first transition leaves the view untouched and returns the error as is.
pub async fn enter_mode(
    view: &dyn RenderedView,
    target: ViewMode,
    policy: RefreshPolicy,
) -> Result<ModeRestore, HostError> {
    let original = view.mode();
    if original != target {
        printer_debug!("switching view from {} to {} mode", original, target);
        view.set_mode(target).await?;
    } else if let RefreshPolicy::ForceRefresh { toggle_delay } = policy {
        printer_debug!("view already in {} mode; toggling to force a refresh", target);
        view.set_mode(target.opposite()).await?;
        time::sleep(toggle_delay).await;
        if let Err(err) = view.set_mode(target).await {
            ModeRestore::new(original).restore(view).await;
            return Err(err);
        }
    }
    Ok(ModeRestore::new(original))
}

/// Runs `body` with `view` forced into `target`, restoring the original mode whatever
/// `body` returns.
///
/// The restore happens only when the returned future runs to completion. Dropping it
/// part-way, for example under `tokio::time::timeout`, leaves the view in `target`;
/// bound the body itself instead.
pub async fn with_mode<T, E, F, Fut>(
    view: &dyn RenderedView,
    target: ViewMode,
    policy: RefreshPolicy,
    body: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<HostError>,
{
    let restore = enter_mode(view, target, policy).await?;
    let result = body().await;
    restore.restore(view).await;
    result
}
