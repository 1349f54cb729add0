use matching::UrgencyLevel;
use server::models::auth::AppRole;
use server::services::suggestion::{ADVISOR_NOT_CONFIGURED, ADVISOR_UNAVAILABLE};
use uuid::Uuid;

use crate::common::{
    ScriptedAdvisor, TestApp, TestSetup, blood_request, days_ago, donor_profile, donor_record,
    routes,
};

mod ranking {
    use super::*;

    #[tokio::test]
    async fn merges_hospital_and_self_registered_donors() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "B+", UrgencyLevel::Normal));
        app.store.add_donor(donor_record(
            hospital,
            "Harish",
            "B+",
            "9876501001",
            3,
            Some(days_ago(200)),
        ));
        let user_id = app.store.add_profile(donor_profile("Lata", "b+", "9876501002"));
        app.store.add_donation(user_id, days_ago(400));
        app.store.add_donation(user_id, days_ago(120));

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["totalDonors"], 2);
        assert_eq!(res.body["eligibleDonors"], 2);
        assert_eq!(res.body["thresholdDays"], 90);

        let suggestions = res.body["suggestions"].as_array().unwrap();
        assert_eq!(suggestions[0]["name"], "Harish");
        assert_eq!(suggestions[0]["isHospitalManaged"], true);
        assert_eq!(suggestions[0]["donationCount"], 3);
        assert_eq!(suggestions[0]["score"], 75);
        assert_eq!(suggestions[1]["name"], "Lata");
        assert_eq!(suggestions[1]["isHospitalManaged"], false);
        assert_eq!(suggestions[1]["donationCount"], 2);
        assert_eq!(suggestions[1]["daysSinceLastDonation"], 120);
        assert_eq!(suggestions[1]["userId"], user_id.to_string());
        assert_eq!(suggestions[1]["donor"]["source"], "self_registered");
    }

    #[tokio::test]
    async fn critical_requests_use_the_shorter_window() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "O-", UrgencyLevel::Critical));
        app.store
            .add_donor(donor_record(hospital, "Recent", "O-", "9876502001", 1, Some(days_ago(55))));
        app.store
            .add_donor(donor_record(hospital, "Rested", "O-", "9876502002", 1, Some(days_ago(61))));

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.body["thresholdDays"], 60);
        assert_eq!(res.body["eligibleDonors"], 1);
        assert_eq!(res.body["ineligibleDonors"], 1);

        let suggestions = res.body["suggestions"].as_array().unwrap();
        assert_eq!(suggestions[0]["name"], "Rested");
        assert_eq!(suggestions[0]["isEligible"], true);
        assert_eq!(suggestions[1]["name"], "Recent");
        assert_eq!(suggestions[1]["isEligible"], false);
        assert_eq!(suggestions[1]["score"], 5);
    }

    #[tokio::test]
    async fn truncates_to_ten_with_eligible_first() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "A+", UrgencyLevel::Normal));
        for i in 0..50 {
            let phone = format!("98765{:05}", i);
            app.store
                .add_donor(donor_record(hospital, "Eligible", "A+", &phone, i, None));
        }
        for i in 50..100 {
            let phone = format!("98765{:05}", i);
            app.store.add_donor(donor_record(
                hospital,
                "Ineligible",
                "A+",
                &phone,
                i,
                Some(days_ago(5)),
            ));
        }

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.body["totalDonors"], 100);
        assert_eq!(res.body["eligibleDonors"], 50);
        assert_eq!(res.body["ineligibleDonors"], 50);

        let suggestions = res.body["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 10);
        assert!(suggestions.iter().all(|s| s["isEligible"] == true));
        let counts: Vec<u64> = suggestions
            .iter()
            .map(|s| s["donationCount"].as_u64().unwrap())
            .collect();
        assert_eq!(counts, (40..50).rev().collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn unknown_blood_group_yields_no_donors() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "XYZ", UrgencyLevel::Normal));
        app.store
            .add_donor(donor_record(hospital, "Someone", "O+", "9876503001", 1, None));

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["totalDonors"], 0);
        assert_eq!(res.body["suggestions"].as_array().unwrap().len(), 0);
        assert_eq!(res.body["message"], "No donors found with blood group XYZ");
    }

    #[tokio::test]
    async fn missing_hospital_is_reported_without_querying_donors() {
        let app = TestApp::spawn().await;
        let id = app
            .store
            .add_request(blood_request(None, "A+", UrgencyLevel::Urgent));
        let token = app.token(Uuid::new_v4(), AppRole::Admin);

        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["reason"], "Blood request is missing hospital information");
        assert_eq!(res.body["thresholdDays"], 60);
        assert_eq!(app.store.donor_queries(), 0);
    }

    #[tokio::test]
    async fn unknown_request_is_reported_as_not_found() {
        let app = TestApp::spawn().await;
        let token = app.token(Uuid::new_v4(), AppRole::Admin);

        let res = app
            .post_with_token(&routes::suggestions(Uuid::new_v4()), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["reason"], "Blood request not found");
        assert_eq!(res.body["suggestions"].as_array().unwrap().len(), 0);
        assert_eq!(res.body["totalDonors"], 0);
        assert_eq!(app.store.donor_queries(), 0);
    }

    #[tokio::test]
    async fn roster_failure_is_reported() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "AB+", UrgencyLevel::Normal));
        app.store
            .add_donor(donor_record(hospital, "Yusuf", "AB+", "9876501090", 1, None));
        app.store.fail_roster();

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["reason"], "Failed to fetch donors");
        assert_eq!(res.body["thresholdDays"], 90);
    }

    #[tokio::test]
    async fn profile_failure_falls_back_to_the_roster() {
        let app = TestApp::spawn().await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "AB+", UrgencyLevel::Normal));
        app.store
            .add_donor(donor_record(hospital, "Yusuf", "AB+", "9876501091", 1, None));
        app.store
            .add_profile(donor_profile("Zoya", "AB+", "9876501092"));
        app.store.fail_profiles();

        let token = app.token(hospital, AppRole::Hospital);
        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["totalDonors"], 1);
        assert_eq!(res.body["suggestions"][0]["name"], "Yusuf");
    }
}

mod advisor {
    use super::*;

    async fn request_with_one_donor(app: &TestApp) -> (Uuid, String) {
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "AB+", UrgencyLevel::Urgent));
        app.store
            .add_donor(donor_record(hospital, "Tara", "AB+", "9876504001", 8, None));
        (id, app.token(hospital, AppRole::Hospital))
    }

    #[tokio::test]
    async fn falls_back_when_not_configured() {
        let app = TestApp::spawn().await;
        let (id, token) = request_with_one_donor(&app).await;

        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.body["aiAnalysis"], ADVISOR_NOT_CONFIGURED);
        assert_eq!(res.body["suggestions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn includes_advisor_text() {
        let app = TestApp::spawn_with(TestSetup {
            advisor: Some(ScriptedAdvisor::replying("Tara is the best match.")),
            ..Default::default()
        })
        .await;
        let (id, token) = request_with_one_donor(&app).await;

        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.body["aiAnalysis"], "Tara is the best match.");
        let prompts = app.advisor.as_ref().unwrap().prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Blood Group: AB+"));
        assert!(prompts[0].contains("\"name\": \"Tara\""));
    }

    #[tokio::test]
    async fn advisor_failure_keeps_heuristic_ranking() {
        let app = TestApp::spawn_with(TestSetup {
            advisor: Some(ScriptedAdvisor::failing()),
            ..Default::default()
        })
        .await;
        let (id, token) = request_with_one_donor(&app).await;

        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["aiAnalysis"], ADVISOR_UNAVAILABLE);
        assert_eq!(res.body["suggestions"][0]["name"], "Tara");
        assert_eq!(res.body["suggestions"][0]["score"], 100);
    }

    #[tokio::test]
    async fn advisor_is_skipped_without_donors() {
        let app = TestApp::spawn_with(TestSetup {
            advisor: Some(ScriptedAdvisor::replying("unused")),
            ..Default::default()
        })
        .await;
        let hospital = Uuid::new_v4();
        let id = app
            .store
            .add_request(blood_request(Some(hospital), "AB+", UrgencyLevel::Normal));
        let token = app.token(hospital, AppRole::Hospital);

        let res = app.post_with_token(&routes::suggestions(id), &token).await;

        assert_eq!(res.body["totalDonors"], 0);
        assert!(res.body.get("aiAnalysis").is_none());
        assert!(app.advisor.as_ref().unwrap().prompts.lock().unwrap().is_empty());
    }
}
