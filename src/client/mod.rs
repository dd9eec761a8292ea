//! Crewdeck API client

pub mod api;
pub mod crewdeck;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod parallel;
pub mod push;

pub use api::{AuthApi, DirectoryApi, InvitationApi, NotificationApi, RequestApi};
pub use crewdeck::CrewdeckClient;
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockCollabClient;
pub use parallel::fan_out_flatten;
pub use push::PushHub;

/// Combined Crewdeck API surface
///
/// Blanket-implemented for anything providing all five sub-traits, so the
/// aggregation layer can hold one `Arc<dyn CollabApi>` regardless of whether
/// it talks to the real backend or a test double.
pub trait CollabApi:
    AuthApi + DirectoryApi + RequestApi + NotificationApi + InvitationApi + Send + Sync
{
}

impl<T> CollabApi for T where
    T: AuthApi + DirectoryApi + RequestApi + NotificationApi + InvitationApi + Send + Sync
{
}
