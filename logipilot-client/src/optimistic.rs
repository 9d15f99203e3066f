use std::future::Future;
use std::sync::RwLock;

use tracing::warn;

use crate::error::ApiResult;
use crate::events::{EventBus, Toast};

/// Runs one optimistic mutation: apply locally, confirm with the server,
/// revert and report on failure.
///
/// `apply` runs under the write lock and returns an undo token capturing
/// exactly what changed; `confirm` is awaited with no lock held; if it
/// fails, `revert` runs under the write lock with that token, the
/// `failure_toast` is published, and the error is handed back. On success
/// the unused undo token is returned so callers can report what changed.
/// Concurrent commits against the same state are safe as long as each undo
/// token only touches what its own `apply` changed.
///
/// Every optimistic path in the crate goes through here so no call site can
/// apply without arranging the matching revert.
pub async fn commit<S, U, Fut>(
    state: &RwLock<S>,
    bus: &EventBus,
    failure_toast: Toast,
    apply: impl FnOnce(&mut S) -> U,
    confirm: Fut,
    revert: impl FnOnce(&mut S, U),
) -> ApiResult<U>
where
    Fut: Future<Output = ApiResult<()>>,
{
    let undo = {
        let mut guard = state.write().expect("lock poisoned");
        apply(&mut guard)
    };

    match confirm.await {
        Ok(()) => Ok(undo),
        Err(error) => {
            warn!("optimistic mutation rejected, reverting: {error}");
            {
                let mut guard = state.write().expect("lock poisoned");
                revert(&mut guard, undo);
            }
            bus.publish_toast(failure_toast);
            Err(error)
        }
    }
}
