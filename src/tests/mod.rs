mod link_tests;
mod notification_tests;

use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use crate::services::{
    AccessGrantStore, InvitationWorkflow, LinkAccessController, NotificationDispatcher,
};
use crate::storage::Storage;

// Each test gets its own storage root under the system temp dir
pub fn temp_storage() -> (Arc<Storage>, PathBuf) {
    let root = std::env::temp_dir().join(format!("huginn-test-{}", Uuid::new_v4()));
    let storage = Arc::new(Storage::open(&root).expect("open test storage"));
    (storage, root)
}

pub fn cleanup(root: &PathBuf) {
    if root.exists() {
        let _ = std::fs::remove_dir_all(root);
    }
}

// Wire up the full component set over one shared storage handle
pub fn build_services(
    storage: Arc<Storage>,
) -> (
    AccessGrantStore,
    InvitationWorkflow,
    LinkAccessController,
    NotificationDispatcher,
) {
    let notifications = NotificationDispatcher::new(storage.clone());
    let grants = AccessGrantStore::new(storage.clone());
    let invitations =
        InvitationWorkflow::new(storage.clone(), grants.clone(), notifications.clone());
    let links = LinkAccessController::new(storage, notifications.clone());

    (grants, invitations, links, notifications)
}
