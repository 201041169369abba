// huginn-service/src/services/mod.rs
pub mod access_grants;
pub mod invitations;
pub mod notifications;
pub mod share_links;

pub use access_grants::AccessGrantStore;
pub use invitations::InvitationWorkflow;
pub use notifications::NotificationDispatcher;
pub use share_links::LinkAccessController;
