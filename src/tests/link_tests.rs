// huginn-service/src/tests/link_tests.rs
#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use chrono::{Duration, Utc};

    use crate::models::{NotificationType, ServiceError};
    use crate::tests::{build_services, cleanup, temp_storage};

    #[test]
    fn test_quota_enforced_under_concurrent_responses() {
        let (storage, root) = temp_storage();
        let (_grants, _invitations, links, _notifications) = build_services(storage);

        let link = links
            .create_link("survey-1", "owner-1", None, Some(5))
            .unwrap();

        // Fire all six submissions at once
        let barrier = Arc::new(Barrier::new(6));
        let mut handles = Vec::new();
        for _ in 0..6 {
            let links = links.clone();
            let token = link.token.clone();
            let barrier = barrier.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                links.record_response(&token)
            }));
        }

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 5, "the quota must never oversell");

        let failures: Vec<_> = results.into_iter().filter_map(|r| r.err()).collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], ServiceError::QuotaExceeded));

        let listed = links.list_for_survey("survey-1").unwrap();
        assert_eq!(listed[0].access_count, 5);
        assert!(!listed[0].is_active, "exhausted link must deactivate");

        // Later visits report the quota, not the inactive flag it set
        let visit = links.resolve_visit(&link.token);
        assert!(matches!(visit, Err(ServiceError::QuotaExceeded)));

        cleanup(&root);
    }

    #[test]
    fn test_expiry_dominates_active_flag() {
        let (storage, root) = temp_storage();
        let (_grants, _invitations, links, _notifications) = build_services(storage);

        let link = links
            .create_link(
                "survey-2",
                "owner-1",
                Some(Utc::now() - Duration::hours(1)),
                None,
            )
            .unwrap();
        assert!(link.is_active, "expiry is checked at read time, not stored");

        let visit = links.resolve_visit(&link.token);
        assert!(matches!(visit, Err(ServiceError::Expired)));

        let submit = links.record_response(&link.token);
        assert!(matches!(submit, Err(ServiceError::Expired)));

        cleanup(&root);
    }

    #[test]
    fn test_resolve_does_not_consume_a_slot() {
        let (storage, root) = temp_storage();
        let (_grants, _invitations, links, _notifications) = build_services(storage);

        let link = links
            .create_link("survey-3", "owner-1", None, Some(2))
            .unwrap();

        for _ in 0..5 {
            links.resolve_visit(&link.token).unwrap();
        }

        let submitted = links.record_response(&link.token).unwrap();
        assert_eq!(submitted.access_count, 1, "only record_response counts");
        assert!(submitted.is_active);

        cleanup(&root);
    }

    #[test]
    fn test_revoked_link_rejects_visits() {
        let (storage, root) = temp_storage();
        let (_grants, _invitations, links, _notifications) = build_services(storage);

        let link = links
            .create_link("survey-4", "owner-1", None, None)
            .unwrap();

        let revoked = links.revoke_link(&link.id, "owner-1").unwrap();
        assert!(!revoked.is_active);

        let visit = links.resolve_visit(&link.token);
        assert!(matches!(visit, Err(ServiceError::Inactive)));

        // Revoking twice is a no-op, not an error
        let again = links.revoke_link(&link.id, "owner-1").unwrap();
        assert!(!again.is_active);

        cleanup(&root);
    }

    #[test]
    fn test_unknown_token_is_not_found() {
        let (storage, root) = temp_storage();
        let (_grants, _invitations, links, _notifications) = build_services(storage);

        let visit = links.resolve_visit("no-such-token");
        assert!(matches!(visit, Err(ServiceError::NotFound)));

        let revoke = links.revoke_link("no-such-id", "owner-1");
        assert!(matches!(revoke, Err(ServiceError::NotFound)));

        cleanup(&root);
    }

    #[test]
    fn test_zero_quota_is_rejected() {
        let (storage, root) = temp_storage();
        let (_grants, _invitations, links, _notifications) = build_services(storage);

        let link = links.create_link("survey-5", "owner-1", None, Some(0));
        assert!(matches!(link, Err(ServiceError::BadRequest(_))));

        cleanup(&root);
    }

    #[test]
    fn test_response_notifies_link_creator() {
        let (storage, root) = temp_storage();
        let (_grants, _invitations, links, notifications) = build_services(storage);

        let link = links
            .create_link("survey-6", "owner-2", None, None)
            .unwrap();
        links.record_response(&link.token).unwrap();

        let inbox = notifications.list_unread("owner-2", 20).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationType::ResponseCompleted);
        assert_eq!(
            inbox[0].data.as_ref().unwrap()["survey_id"].as_str().unwrap(),
            "survey-6"
        );

        cleanup(&root);
    }
}
