//! API trait definitions split by responsibility
//!
//! This module organizes the Crewdeck API surface into focused sub-traits:
//! - [`AuthApi`] - Authentication operations
//! - [`DirectoryApi`] - Organization/project/task/user listing operations
//! - [`RequestApi`] - Join request listing and review operations
//! - [`NotificationApi`] - Notification operations
//! - [`InvitationApi`] - Invitation operations
//!
//! The [`CollabApi`](super::CollabApi) super-trait combines all five.

mod auth;
mod directory;
mod invitations;
mod notifications;
mod requests;

pub use auth::AuthApi;
pub use directory::DirectoryApi;
pub use invitations::InvitationApi;
pub use notifications::NotificationApi;
pub use requests::RequestApi;
