//! API data models

pub mod auth;
pub mod directory;
pub mod invitation;
pub mod notification;
pub mod request;

pub use auth::SessionToken;
pub use directory::{Organization, Project, Task, UserSummary};
pub use invitation::{Invitation, InvitationResponse, InvitationStatus};
pub use notification::Notification;
pub use request::{JoinRequest, RequestStatus, ReviewDecision};
