mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use common::TestApp;

fn event_body(title: &str) -> Value {
    let start = Utc::now() + Duration::days(7);
    json!({
        "title": title,
        "description": "Bring water",
        "location": "Town Hall",
        "start_date": start.to_rfc3339(),
        "end_date": (start + Duration::hours(2)).to_rfc3339(),
    })
}

#[tokio::test]
async fn test_volunteer_registration_flow() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, admin_token) = app.admin("admin@example.com").await?;

    let (status, body) = app
        .send("POST", "/api/auth/register", None, Some(json!({
            "first_name": "Sam",
            "last_name": "Helper",
            "email": "Sam@Example.com",
            "password": "helping-hands",
        })))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "sam@example.com");
    assert_eq!(body["user"]["role"], "volunteer");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = app
        .send("POST", "/api/auth/login", None, Some(json!({
            "email": "sam@example.com",
            "password": "helping-hands",
        })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let volunteer_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .send("POST", "/api/events", Some(&admin_token), Some(event_body("River Cleanup")))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["status"], "upcoming");
    let event_id = body["event"]["id"].as_str().unwrap().to_string();

    let submit = json!({ "event_id": event_id });
    let (status, body) = app
        .send("POST", "/api/registrations", Some(&volunteer_token), Some(submit.clone()))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registration"]["registration_status"], "pending");
    let registration_id = body["registration"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send("POST", "/api/registrations", Some(&volunteer_token), Some(submit))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app
        .send(
            "PUT",
            &format!("/api/registrations/{}", registration_id),
            Some(&admin_token),
            Some(json!({ "registration_status": "approved" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration approved successfully");

    let (status, body) = app
        .send("GET", "/api/registrations/mine", Some(&volunteer_token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    let mine = body.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["registration_status"], "approved");
    assert_eq!(mine[0]["event_title"], "River Cleanup");

    let (status, body) = app
        .send("GET", &format!("/api/events/{}/registrations", event_id), Some(&admin_token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["first_name"], "Sam");

    let sent = app.sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "sam@example.com");
    assert!(sent[0].subject.contains("Approved"));

    Ok(())
}

#[tokio::test]
async fn test_invalid_decision_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, admin_token) = app.admin("admin@example.com").await?;
    let (volunteer, _) = app.volunteer("wait@example.com").await?;
    let event = common::create_event(&app.context, "Library Sort", 2).await?;
    let registration = app.context.registration_service.submit(volunteer.id, event.id).await?;

    let (status, _) = app
        .send(
            "PUT",
            &format!("/api/registrations/{}", registration.id),
            Some(&admin_token),
            Some(json!({ "registration_status": "cancelled" })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "PUT",
            &format!("/api/registrations/{}", uuid::Uuid::new_v4()),
            Some(&admin_token),
            Some(json!({ "registration_status": "approved" })),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.sink.sent().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_guards() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, admin_token) = app.admin("admin@example.com").await?;
    let (_, volunteer_token) = app.volunteer("guard@example.com").await?;

    let (status, _) = app.send("GET", "/api/users/profile", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("GET", "/api/users/profile", Some("not-a-token"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send("GET", "/api/users/profile", Some(&volunteer_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "guard@example.com");

    let (status, _) = app
        .send("POST", "/api/events", Some(&volunteer_token), Some(event_body("Sneaky")))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("GET", "/api/registrations", Some(&volunteer_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let event = common::create_event(&app.context, "Admin Only", 3).await?;
    let (status, _) = app
        .send(
            "POST",
            "/api/registrations",
            Some(&admin_token),
            Some(json!({ "event_id": event.id })),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reading the catalog needs no token
    let (status, body) = app.send("GET", "/api/events", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_event_validation() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, admin_token) = app.admin("admin@example.com").await?;

    let mut backwards = event_body("Backwards");
    backwards["end_date"] = json!((Utc::now() - Duration::days(1)).to_rfc3339());
    let (status, body) = app
        .send("POST", "/api/events", Some(&admin_token), Some(backwards))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = app
        .send("GET", &format!("/api/events/{}", uuid::Uuid::new_v4()), None, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_announcement_filters_over_http() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, admin_token) = app.admin("admin@example.com").await?;
    let event = common::create_event(&app.context, "Garden Day", 5).await?;

    for (title, visibility) in [("Open to all", "public"), ("Staff only", "private")] {
        let (status, _) = app
            .send(
                "POST",
                "/api/announcements",
                Some(&admin_token),
                Some(json!({
                    "event_id": event.id,
                    "title": title,
                    "content": "Details inside",
                    "visibility": visibility,
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.send("GET", "/api/announcements", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body.as_array().unwrap().iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Open to all"]);
    assert_eq!(body[0]["event_title"], "Garden Day");

    let (status, _) = app.send("GET", "/api/announcements?filter=private", None, None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("GET", "/api/announcements?filter=everything", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A bad token on an optional route reads as anonymous
    let (status, body) = app
        .send("GET", "/api/announcements", Some("expired-or-garbage"), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .send("GET", "/api/announcements?filter=private", Some(&admin_token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Staff only");

    let (status, body) = app
        .send("GET", &format!("/api/announcements/event/{}", event.id), Some(&admin_token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, _) = app.send("GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_malformed_input_gets_json_bad_request() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, admin_token) = app.admin("admin@example.com").await?;
    let (volunteer, volunteer_token) = app.volunteer("typo@example.com").await?;
    let event = common::create_event(&app.context, "Blood Drive", 2).await?;
    let registration = app.context.registration_service.submit(volunteer.id, event.id).await?;
    let decide_uri = format!("/api/registrations/{}", registration.id);

    let cases = [
        ("PUT", decide_uri.as_str(), &admin_token, Some(json!({ "registration_status": 42 }))),
        ("PUT", decide_uri.as_str(), &admin_token, Some(json!({}))),
        ("PUT", "/api/registrations/not-a-uuid", &admin_token, Some(json!({ "registration_status": "approved" }))),
        ("POST", "/api/registrations", &volunteer_token, Some(json!({ "event_id": "nope" }))),
        ("PUT", "/api/events/12345", &admin_token, Some(event_body("Renamed"))),
        ("POST", "/api/events", &admin_token, Some(json!({ "title": "No dates" }))),
        ("PUT", "/api/users/profile", &volunteer_token, None),
    ];

    for (method, uri, token, body) in cases {
        let (status, body) = app.send(method, uri, Some(token.as_str()), body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert!(body["error"].is_string(), "{} {} returned {}", method, uri, body);
    }

    let stored = app.context.registration_repo.find_by_id(registration.id).await?.unwrap();
    assert_eq!(stored.registration_status.as_str(), "pending");
    assert!(app.sink.sent().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_bootstrap_admin_with_mixed_case_email_can_login() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let created = app.context.user_service
        .ensure_admin(&volunteer_portal::config::BootstrapAdminConfig {
            email: " Admin@Example.org".to_string(),
            password: "admin-password".to_string(),
            first_name: "Portal".to_string(),
            last_name: "Admin".to_string(),
        })
        .await?
        .unwrap();
    assert_eq!(created.email, "admin@example.org");

    let (status, body) = app
        .send("POST", "/api/auth/login", None, Some(json!({
            "email": "Admin@Example.org",
            "password": "admin-password",
        })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["email"], "admin@example.org");

    Ok(())
}
