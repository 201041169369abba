// huginn-service/src/tests/notification_tests.rs
#[cfg(test)]
mod tests {
    use std::thread;

    use serde_json::json;

    use crate::models::{NotificationType, ServiceError};
    use crate::services::NotificationDispatcher;
    use crate::tests::{cleanup, temp_storage};

    #[test]
    fn test_dispatch_enforces_payload_contract() {
        let (storage, root) = temp_storage();
        let dispatcher = NotificationDispatcher::new(storage);

        // The invitation type requires a token in the payload
        let ok = dispatcher.dispatch(
            "user-1",
            NotificationType::WorkspaceInvitation,
            "You have been invited",
            None,
            Some(("collector", "collector-1")),
            Some(json!({ "token": "abc" })),
        );
        assert!(ok.is_ok());

        let empty_object = dispatcher.dispatch(
            "user-1",
            NotificationType::WorkspaceInvitation,
            "You have been invited",
            None,
            None,
            Some(json!({})),
        );
        assert!(matches!(empty_object, Err(ServiceError::InvalidPayload(_))));

        let missing = dispatcher.dispatch(
            "user-1",
            NotificationType::WorkspaceInvitation,
            "You have been invited",
            None,
            None,
            None,
        );
        assert!(matches!(missing, Err(ServiceError::InvalidPayload(_))));

        let not_an_object = dispatcher.dispatch(
            "user-1",
            NotificationType::CollectorCreated,
            "Collector created",
            None,
            None,
            Some(json!("collector-1")),
        );
        assert!(matches!(not_an_object, Err(ServiceError::InvalidPayload(_))));

        cleanup(&root);
    }

    #[test]
    fn test_payload_stored_verbatim() {
        let (storage, root) = temp_storage();
        let dispatcher = NotificationDispatcher::new(storage);

        // Extra keys beyond the required ones pass through untouched
        let data = json!({
            "survey_id": "survey-1",
            "collector_token": "tok-123",
            "action_url": "/public/response/tok-123",
        });
        let notification = dispatcher
            .dispatch(
                "user-2",
                NotificationType::SurveyShared,
                "A survey has been shared with you",
                None,
                Some(("survey", "survey-1")),
                Some(data.clone()),
            )
            .unwrap();

        assert_eq!(notification.data.unwrap(), data);

        cleanup(&root);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let (storage, root) = temp_storage();
        let dispatcher = NotificationDispatcher::new(storage);

        let notification = dispatcher
            .dispatch(
                "user-3",
                NotificationType::ResponseCompleted,
                "New survey response",
                None,
                None,
                Some(json!({ "survey_id": "survey-1" })),
            )
            .unwrap();
        assert!(!notification.is_read);

        let first = dispatcher.mark_read(&notification.id, "user-3").unwrap();
        assert!(first.is_read);
        assert!(first.read_at.is_some());

        // A second call is a no-op returning the same state
        let second = dispatcher.mark_read(&notification.id, "user-3").unwrap();
        assert!(second.is_read);
        assert_eq!(second.read_at, first.read_at);

        cleanup(&root);
    }

    #[test]
    fn test_foreign_notifications_are_protected() {
        let (storage, root) = temp_storage();
        let dispatcher = NotificationDispatcher::new(storage);

        let notification = dispatcher
            .dispatch(
                "user-4",
                NotificationType::WorkspaceMemberAdded,
                "Invitation accepted",
                None,
                None,
                Some(json!({ "member_id": "user-5" })),
            )
            .unwrap();

        let read = dispatcher.mark_read(&notification.id, "someone-else");
        assert!(matches!(read, Err(ServiceError::Forbidden)));

        let delete = dispatcher.delete(&notification.id, "someone-else");
        assert!(matches!(delete, Err(ServiceError::Forbidden)));

        // The owner can delete it
        dispatcher.delete(&notification.id, "user-4").unwrap();
        let gone = dispatcher.mark_read(&notification.id, "user-4");
        assert!(matches!(gone, Err(ServiceError::NotFound)));

        cleanup(&root);
    }

    #[test]
    fn test_unread_listing_orders_and_limits() {
        let (storage, root) = temp_storage();
        let dispatcher = NotificationDispatcher::new(storage);

        let mut ids = Vec::new();
        for i in 0..5 {
            let notification = dispatcher
                .dispatch(
                    "user-6",
                    NotificationType::ResponseCompleted,
                    &format!("Response {}", i),
                    None,
                    None,
                    Some(json!({ "survey_id": "survey-1" })),
                )
                .unwrap();
            ids.push(notification.id);
            thread::sleep(std::time::Duration::from_millis(5));
        }

        dispatcher.mark_read(&ids[4], "user-6").unwrap();

        assert_eq!(dispatcher.unread_count("user-6").unwrap(), 4);

        let unread = dispatcher.list_unread("user-6", 3).unwrap();
        assert_eq!(unread.len(), 3);
        // Newest unread first; the read one is absent
        assert_eq!(unread[0].title, "Response 3");
        assert_eq!(unread[1].title, "Response 2");

        cleanup(&root);
    }

    #[test]
    fn test_paginated_listing_reports_total() {
        let (storage, root) = temp_storage();
        let dispatcher = NotificationDispatcher::new(storage);

        for i in 0..7 {
            dispatcher
                .dispatch(
                    "user-7",
                    NotificationType::ResponseCompleted,
                    &format!("Response {}", i),
                    None,
                    None,
                    Some(json!({ "survey_id": "survey-1" })),
                )
                .unwrap();
            thread::sleep(std::time::Duration::from_millis(5));
        }

        let (page, total) = dispatcher.list("user-7", 3, 3).unwrap();
        assert_eq!(total, 7);
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].title, "Response 3");

        cleanup(&root);
    }

    #[test]
    fn test_mark_all_read() {
        let (storage, root) = temp_storage();
        let dispatcher = NotificationDispatcher::new(storage);

        for _ in 0..3 {
            dispatcher
                .dispatch(
                    "user-8",
                    NotificationType::ResponseCompleted,
                    "New survey response",
                    None,
                    None,
                    Some(json!({ "survey_id": "survey-1" })),
                )
                .unwrap();
        }

        assert_eq!(dispatcher.mark_all_read("user-8").unwrap(), 3);
        assert_eq!(dispatcher.mark_all_read("user-8").unwrap(), 0);
        assert_eq!(dispatcher.unread_count("user-8").unwrap(), 0);

        cleanup(&root);
    }
}
