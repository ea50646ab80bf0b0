//! Behaviour of the synchronization client.
//!
//! Service functions take the [`LocalStore`](crate::store::LocalStore) they
//! mutate and the remote authority they talk to. They are the only writers of
//! the store.

use crate::repository::SessionReader;
use crate::store::LocalStore;

pub mod categories;
pub mod description;
pub mod edit_session;
pub mod errors;
pub mod transactions;

pub use errors::{ServiceError, ServiceResult};

/// Refuses the operation, without touching the remote authority beyond the
/// session check, when the user is signed out.
pub(crate) async fn ensure_authenticated<R>(store: &LocalStore, repo: &R) -> ServiceResult<()>
where
    R: SessionReader,
{
    if repo.is_authenticated().await {
        return Ok(());
    }
    log::warn!("Refusing remote operation: user is not authenticated");
    store.notify_unauthenticated();
    Err(ServiceError::Unauthorized)
}
