use matching::{HospitalContact, RequestStatus, UrgencyLevel};
use server::models::auth::AppRole;
use uuid::Uuid;

use crate::common::{
    TestApp, TestSetup, blood_request, days_ago, donor_profile, donor_record, routes,
};

mod preconditions {
    use super::*;

    #[tokio::test]
    async fn missing_hospital_is_reported_without_querying_donors() {
        let app = TestApp::spawn().await;
        let id = app
            .store
            .add_request(blood_request(None, "O+", UrgencyLevel::Critical));
        let token = app.token(Uuid::new_v4(), AppRole::Admin);

        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["reason"], "Blood request is missing hospital information");
        assert_eq!(res.body["notified"], 0);
        assert_eq!(res.body["total"], 0);
        assert_eq!(app.store.donor_queries(), 0);
        assert_eq!(app.store.request_status(id), RequestStatus::Pending);
    }

    #[tokio::test]
    async fn blank_blood_group_is_reported() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "  ", UrgencyLevel::Normal));
        let token = app.token(hospital, AppRole::Hospital);

        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["reason"], "Blood request is missing a blood group");
        assert_eq!(app.store.donor_queries(), 0);
    }

    #[tokio::test]
    async fn closed_request_is_not_alerted() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let mut request = blood_request(Some(hospital), "A+", UrgencyLevel::Normal);
        request.status = RequestStatus::Fulfilled;
        let id = app.store.add_request(request);
        app.store
            .add_donor(donor_record(hospital, "Ajay", "A+", "9876500001", 1, None));
        let token = app.token(hospital, AppRole::Hospital);

        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["reason"], "Blood request is already fulfilled");
        assert!(app.sms.recipients().is_empty());
        assert_eq!(app.store.request_status(id), RequestStatus::Fulfilled);
    }
}

mod access {
    use super::*;

    #[tokio::test]
    async fn unknown_request_is_reported_as_not_found() {
        let app = TestApp::spawn().await;
        let token = app.token(Uuid::new_v4(), AppRole::Admin);

        let res = app
            .post_with_token(&routes::alerts(Uuid::new_v4()), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["reason"], "Blood request not found");
        assert_eq!(res.body["notified"], 0);
        assert_eq!(res.body["total"], 0);
        assert_eq!(app.store.donor_queries(), 0);
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app.post_without_token(&routes::alerts(Uuid::new_v4())).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app
            .post_with_token(&routes::alerts(Uuid::new_v4()), "not-a-jwt")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn donors_cannot_trigger_alerts() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "B+", UrgencyLevel::Normal));
        let token = app.token(Uuid::new_v4(), AppRole::Donor);

        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn other_hospitals_request_looks_missing() {
        let app = TestApp::spawn().await;
        let id = app
            .store
            .add_request(blood_request(Some(Uuid::new_v4()), "B+", UrgencyLevel::Normal));
        let token = app.token(Uuid::new_v4(), AppRole::Hospital);

        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(app.store.donor_queries(), 0);
    }

    #[tokio::test]
    async fn malformed_id_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.token(Uuid::new_v4(), AppRole::Admin);

        let res = app
            .post_with_token("/api/v1/requests/not-a-uuid/alerts", &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn alerts_eligible_donors_once_each() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "O+", UrgencyLevel::Urgent));
        app.store.add_hospital(
            hospital,
            HospitalContact {
                name: "Ruby Hall Clinic".into(),
                address: Some("40 Sassoon Road".into()),
                phone: Some("020-26163391".into()),
            },
        );

        // Linked to a self-registered profile that must not be alerted twice.
        let linked = donor_profile("Meena Joshi", "O+", "9876500002");
        let mut record =
            donor_record(hospital, "Meena Joshi", " o+ ", "9876500002", 4, Some(days_ago(56)));
        record.linked_user_id = Some(linked.user_id);
        app.store.add_donor(record);
        app.store.add_profile(linked);

        app.store.add_donor(donor_record(
            hospital,
            "Rohit",
            "O+",
            "9876500003",
            2,
            Some(days_ago(55)),
        ));
        app.store
            .add_donor(donor_record(hospital, "Arun", "A+", "9876500004", 9, None));
        app.store
            .add_profile(donor_profile("Kavya", "o+", "+91 98765 00005"));

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["notified"], 2);
        assert_eq!(res.body["total"], 2);
        assert_eq!(res.body["matchingDonors"], 3);
        assert_eq!(res.body["smsSuccessCount"], 2);
        assert_eq!(res.body["failedCount"], 0);
        assert_eq!(res.body["thresholdDays"], 56);
        assert_eq!(
            res.body["message"],
            "Alerts sent to 2 matching donors (SMS: 2, Email: 0)"
        );

        let mut recipients = app.sms.recipients();
        recipients.sort();
        assert_eq!(recipients, vec!["+919876500002", "+919876500005"]);

        let body = app.sms.sent.lock().unwrap()[0].1.clone();
        assert!(body.contains("Hospital: Ruby Hall Clinic"));
        assert!(body.contains("Address: 40 Sassoon Road"));

        assert_eq!(app.store.request_status(id), RequestStatus::AlertSent);
    }

    #[tokio::test]
    async fn no_eligible_donors_still_marks_alert_sent() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "AB-", UrgencyLevel::Critical));
        app.store.add_donor(donor_record(
            hospital,
            "Ishaan",
            "AB-",
            "9876500010",
            3,
            Some(days_ago(10)),
        ));

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["notified"], 0);
        assert_eq!(res.body["matchingDonors"], 1);
        let message = res.body["message"].as_str().unwrap();
        assert!(
            message.starts_with("No eligible donors found. Found 1 donors with blood group AB-")
        );
        assert!(app.sms.recipients().is_empty());
        assert_eq!(app.store.request_status(id), RequestStatus::AlertSent);
    }

    #[tokio::test]
    async fn email_rescues_failed_sms_and_failures_are_counted() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "B-", UrgencyLevel::Normal));

        let mut with_email = donor_record(hospital, "Neha", "B-", "9876500020", 1, None);
        with_email.email = Some("neha@example.com".into());
        app.store.add_donor(with_email);
        app.store
            .add_donor(donor_record(hospital, "Vikram", "B-", "12345", 1, None));
        app.sms.fail_for("+919876500020");

        let token = app.token(Uuid::new_v4(), AppRole::Admin);
        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.body["total"], 2);
        assert_eq!(res.body["notified"], 1);
        assert_eq!(res.body["smsSuccessCount"], 0);
        assert_eq!(res.body["emailSuccessCount"], 1);
        assert_eq!(res.body["failedCount"], 1);

        let emails = app.email.sent.lock().unwrap().clone();
        assert_eq!(
            emails,
            vec![(
                "neha@example.com".to_string(),
                "URGENT: B- Blood Needed - HEMO LINK".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn failed_history_lookup_treats_donor_as_never_donated() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "A-", UrgencyLevel::Normal));
        let profile = donor_profile("Pooja", "A-", "9876500030");
        let user_id = profile.user_id;
        app.store.add_profile(profile);
        app.store.add_donation(user_id, days_ago(3));
        app.store.fail_history_for(user_id);

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["notified"], 1);
        assert_eq!(app.sms.recipients(), vec!["+919876500030"]);
    }

    #[tokio::test]
    async fn history_is_only_looked_up_for_matching_profiles() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "O-", UrgencyLevel::Normal));
        app.store.add_profile(donor_profile("One", "O-", "9876500040"));
        app.store.add_profile(donor_profile("Two", "B+", "9876500041"));
        app.store.add_profile(donor_profile("Three", "A+", "9876500042"));

        let token = app.token(hospital, AppRole::Hospital);
        app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(app.store.history_lookups(), 1);
    }

    #[tokio::test]
    async fn profiles_already_on_the_roster_skip_history_lookup() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "B-", UrgencyLevel::Normal));

        let linked = donor_profile("Farah", "B-", "9876500060");
        let mut record = donor_record(hospital, "Farah", "B-", "9876500061", 1, None);
        record.linked_user_id = Some(linked.user_id);
        app.store.add_donor(record);
        app.store.add_profile(linked);
        app.store
            .add_donor(donor_record(hospital, "Gopal", "B-", "9876500062", 1, None));
        app.store
            .add_profile(donor_profile("Gopal K", "B-", "98765 00062"));
        app.store
            .add_profile(donor_profile("Hema", "B-", "9876500063"));

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.body["notified"], 3);
        assert_eq!(res.body["matchingDonors"], 3);
        assert_eq!(app.store.history_lookups(), 1);
    }

    #[tokio::test]
    async fn reports_disabled_sms_channel() {
        let app = TestApp::spawn_with(TestSetup {
            sms: false,
            ..Default::default()
        })
        .await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "A+", UrgencyLevel::Normal));
        app.store
            .add_donor(donor_record(hospital, "Sunil", "A+", "9876500050", 0, None));

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.body["smsConfigured"], false);
        assert_eq!(res.body["emailConfigured"], true);
        assert_eq!(res.body["notified"], 0);
        assert_eq!(res.body["failedCount"], 1);
        assert_eq!(
            res.body["message"],
            "Alerts sent to 0 matching donors (Email: 0). \
             SMS disabled - SMS provider not configured."
        );
    }
}

mod store_failures {
    use super::*;

    #[tokio::test]
    async fn roster_failure_is_reported_and_nothing_is_sent() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "O+", UrgencyLevel::Urgent));
        app.store
            .add_profile(donor_profile("Deepa", "O+", "9876500070"));
        app.store.fail_roster();

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["reason"], "Failed to fetch donors");
        assert_eq!(res.body["notified"], 0);
        assert!(app.sms.recipients().is_empty());
        assert_eq!(app.store.request_status(id), RequestStatus::Pending);
    }

    #[tokio::test]
    async fn profile_failure_still_alerts_the_roster() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "O+", UrgencyLevel::Urgent));
        app.store
            .add_donor(donor_record(hospital, "Vikram", "O+", "9876500071", 2, None));
        app.store
            .add_profile(donor_profile("Deepa", "O+", "9876500072"));
        app.store.fail_profiles();

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::alerts(id), &token).await;

        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["notified"], 1);
        assert_eq!(app.sms.recipients(), vec!["+919876500071"]);
        assert_eq!(app.store.history_lookups(), 0);
        assert_eq!(app.store.request_status(id), RequestStatus::AlertSent);
    }
}
