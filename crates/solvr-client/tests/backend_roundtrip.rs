//! End-to-end client tests against a local `tiny_http` server.

use std::io::Read;
use std::thread::JoinHandle;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use solvr_client::{ClientError, LoginRequest, MarketplaceApi, MarketplaceClient};
use solvr_core::entities::{GeoPoint, SubmissionPayload, SubmissionSource};
use solvr_core::enums::UserRole;

/// A request as seen by the fake backend.
#[derive(Debug)]
struct Recorded {
    method: String,
    path: String,
    body: Value,
}

/// Serve one canned `(status, body)` reply per expected request, then stop.
fn serve(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Recorded>>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
    let addr = server
        .server_addr()
        .to_ip()
        .expect("test server listens on ip");
    let handle = std::thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, reply) in replies {
            let mut request = server.recv().expect("receive request");
            let mut body = String::new();
            request
                .as_reader()
                .read_to_string(&mut body)
                .expect("read body");
            seen.push(Recorded {
                method: request.method().to_string(),
                path: request.url().to_string(),
                body: serde_json::from_str(&body).unwrap_or(Value::Null),
            });
            let response = tiny_http::Response::from_string(reply)
                .with_status_code(status)
                .with_header(
                    tiny_http::Header::from_bytes("Content-Type", "application/json").unwrap(),
                );
            request.respond(response).expect("send response");
        }
        seen
    });
    (format!("http://{addr}/api"), handle)
}

fn client(base_url: &str) -> MarketplaceClient {
    MarketplaceClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn parse_text_posts_text_and_user() {
    let (base, server) = serve(vec![(
        200,
        r#"{"success":true,"message":"ok","data":{"type":"Code","topic":"Python ML"}}"#,
    )]);

    let resp = client(&base)
        .parse_text("I need a 4 page Python ML assignment", Some("u1"))
        .await
        .unwrap();
    assert!(resp.success);
    assert_eq!(resp.data["type"], "Code");

    let seen = server.join().unwrap();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path, "/api/nlp/parse");
    assert_eq!(
        seen[0].body,
        json!({ "text": "I need a 4 page Python ML assignment", "userId": "u1" })
    );
}

#[tokio::test]
async fn create_assignment_sends_payload_once() {
    let (base, server) = serve(vec![(200, r#"{"message":"Assignment created"}"#)]);

    let payload = SubmissionPayload::build(
        Some("u1"),
        SubmissionSource {
            topic: Some("Landing page".into()),
            estimated_price: 250.0,
            deadline: Some("2025-11-24".into()),
            skills: vec!["Next.js".into()],
            urgency: None,
            pages: None,
            raw_entities: json!({}),
        },
        "Landing page",
        GeoPoint::new(12.5, 77.25),
        chrono::Utc::now(),
    );
    let created = client(&base).create_assignment(&payload).await.unwrap();
    assert_eq!(created.id, None);
    assert_eq!(created.message.as_deref(), Some("Assignment created"));

    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/api/assignment/create");
    assert_eq!(seen[0].body["price"], 250.0);
    assert_eq!(seen[0].body["deadline"], "2025-11-24T00:00:00Z");
    assert_eq!(seen[0].body["lat"], 12.5);
}

#[tokio::test]
async fn create_assignment_surfaces_server_status() {
    let (base, server) = serve(vec![(500, r#"{"error":"Failed to create assignment"}"#)]);

    let payload = SubmissionPayload::build(
        None,
        SubmissionSource::default(),
        "Essay",
        GeoPoint::new(0.0, 0.0),
        chrono::Utc::now(),
    );
    let err = client(&base).create_assignment(&payload).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    server.join().unwrap();
}

#[tokio::test]
async fn match_solvers_preserves_backend_order() {
    let (base, server) = serve(vec![(
        200,
        r#"[{"User":{"id":"b","name":"Second best","role":"solver"},"Score":0.4},
            {"User":{"id":"a","name":"Best","role":"solver","price_per_job":450},"Score":0.9}]"#,
    )]);

    let solvers = client(&base)
        .match_solvers("landing page", GeoPoint::new(0.0, 0.0))
        .await
        .unwrap();
    let names: Vec<&str> = solvers.iter().map(|s| s.user.name.as_str()).collect();
    assert_eq!(names, ["Second best", "Best"]);

    let seen = server.join().unwrap();
    assert_eq!(seen[0].body["description"], "landing page");
}

#[tokio::test]
async fn match_solvers_null_body_is_empty() {
    let (base, server) = serve(vec![(200, "null")]);
    let solvers = client(&base)
        .match_solvers("anything", GeoPoint::new(0.0, 0.0))
        .await
        .unwrap();
    assert!(solvers.is_empty());
    server.join().unwrap();
}

#[tokio::test]
async fn login_rejected_is_api_error() {
    let (base, server) = serve(vec![(401, r#"{"error":"Invalid credentials"}"#)]);
    let err = client(&base)
        .login(&LoginRequest {
            email: "a@b.c",
            password: "wrong",
            role: UserRole::Buyer,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 401, .. }));

    let seen = server.join().unwrap();
    assert_eq!(seen[0].body["role"], "buyer");
}

#[tokio::test]
async fn share_location_encodes_user_id() {
    let (base, server) = serve(vec![(200, "{}")]);
    client(&base)
        .share_location("user 1", GeoPoint::new(1.5, -2.25))
        .await
        .unwrap();

    let seen = server.join().unwrap();
    assert_eq!(seen[0].path, "/api/users/user%201/location");
    assert_eq!(seen[0].body, json!({ "latitude": 1.5, "longitude": -2.25 }));
}
