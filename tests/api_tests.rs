use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use jobtracker::api::AppState;
use jobtracker::config::Config;
use sea_orm::ConnectionTrait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing::field::{Field, Visit};
use tracing::span::{Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

async fn spawn_app() -> Router {
    spawn_app_with_state().await.0
}

async fn spawn_app_with_state() -> (Router, Arc<AppState>) {
    let db_path = std::env::temp_dir().join(format!("jobtracker-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite://{}", db_path.display());
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = jobtracker::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    (jobtracker::api::router(state.clone()), state)
}

/// Collects `user_id` values recorded on spans and the text of warnings.
#[derive(Clone, Default)]
struct Captured {
    user_ids: Arc<Mutex<Vec<(String, String)>>>,
    warnings: Arc<Mutex<Vec<String>>>,
}

struct FieldText {
    name: &'static str,
    value: Option<String>,
}

impl Visit for FieldText {
    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == self.name {
            self.value = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == self.name {
            self.value = Some(format!("{value:?}"));
        }
    }
}

impl<S> Layer<S> for Captured
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let mut visitor = FieldText {
            name: "user_id",
            value: None,
        };
        values.record(&mut visitor);
        if let (Some(value), Some(span)) = (visitor.value, ctx.span(id)) {
            self.user_ids
                .lock()
                .unwrap()
                .push((span.name().to_string(), value));
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = FieldText {
                name: "message",
                value: None,
            };
            event.record(&mut visitor);
            if let Some(message) = visitor.value {
                self.warnings.lock().unwrap().push(message);
            }
        }
    }
}

struct Reply {
    status: StatusCode,
    body: Value,
    cookie: Option<String>,
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    Reply {
        status,
        body,
        cookie,
    }
}

async fn signup(app: &Router, name: &str, email: &str) -> Reply {
    send(
        app,
        "POST",
        "/auth/signup",
        Some(json!({ "name": name, "email": email, "password": "secret1" })),
        None,
    )
    .await
}

/// Signs up and logs in, returning the session cookie.
async fn login_as(app: &Router, name: &str, email: &str) -> String {
    signup(app, name, email).await;
    let reply = send(
        app,
        "POST",
        "/auth/login",
        Some(json!({ "email": email, "password": "secret1" })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.cookie.expect("login should set a session cookie")
}

fn job(company: &str, applied: &str) -> Value {
    json!({
        "companyName": company,
        "jobRole": "Backend Engineer",
        "comment": "via referral",
        "status": "APPLIED",
        "resumeUsed": "resume-v3.pdf",
        "jobId": "REQ-17",
        "appliedDate": applied
    })
}

async fn add_job(app: &Router, cookie: &str, company: &str, applied: &str) {
    let reply = send(app, "POST", "/jobs", Some(job(company, applied)), Some(cookie)).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = spawn_app().await;

    for uri in ["/jobs", "/jobs/1", "/user", "/jobs/between?from=2024-01-01&to=2024-02-01"] {
        let reply = send(&app, "GET", uri, None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(reply.body["error"]["status"], 401);
        assert!(reply.body["timestamp"].is_string());
    }

    let reply = send(&app, "GET", "/jobs", None, Some("jobtracker.sid=forged")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup() {
    let app = spawn_app().await;

    let reply = signup(&app, "Ada", "ada@example.com").await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert!(reply.body["data"]["id"].as_i64().unwrap() > 0);
    assert_eq!(reply.body["data"]["email"], "ada@example.com");
    assert!(reply.body["data"].get("password").is_none());
    assert!(reply.body["data"].get("passwordHash").is_none());

    let reply = signup(&app, "Imposter", "ADA@example.com").await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["error"]["status"], 409);

    let reply = send(
        &app,
        "POST",
        "/auth/signup",
        Some(json!({ "name": "", "email": "nope", "password": "123" })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["error"]["message"],
        "Please enter a valid email address, Please enter a valid name, \
         Password length must be between 5 and 10 characters"
    );
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = spawn_app().await;
    signup(&app, "Ada", "ada@example.com").await;

    let reply = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "email": "ada@example.com", "password": "wrong1" })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"]["message"], "Invalid email or password");

    let reply = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "email": "ghost@example.com", "password": "secret1" })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user() {
    let app = spawn_app().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;

    let reply = send(&app, "GET", "/user", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["name"], "Ada");
    assert_eq!(reply.body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_ownership_end_to_end() {
    let app = spawn_app().await;

    let alice = login_as(&app, "Alice", "alice@example.com").await;
    let reply = send(
        &app,
        "POST",
        "/jobs",
        Some(job("companyX", "2024-03-01")),
        Some(&alice),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["data"]["message"], "Job Details Saved Successfully");

    let reply = send(&app, "GET", "/jobs?page=0", None, Some(&alice)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let jobs = reply.body["data"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["companyName"], "companyX");
    assert_eq!(jobs[0]["jobId"], "REQ-17");
    assert_eq!(jobs[0]["resumeUsed"], "resume-v3.pdf");
    assert_eq!(jobs[0]["appliedDate"], "2024-03-01");
    let job_id = jobs[0]["id"].as_i64().unwrap();

    let bob = login_as(&app, "Bob", "bob@example.com").await;

    let reply = send(
        &app,
        "PUT",
        &format!("/jobs/{job_id}"),
        Some(job("stolen", "2024-03-01")),
        Some(&bob),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["error"]["status"], 403);

    let reply = send(&app, "GET", &format!("/jobs/{job_id}"), None, Some(&bob)).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(&app, "DELETE", &format!("/jobs/{job_id}"), None, Some(&bob)).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(&app, "GET", "/jobs", None, Some(&bob)).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 0);

    let reply = send(
        &app,
        "PUT",
        "/jobs/999999",
        Some(job("stolen", "2024-03-01")),
        Some(&bob),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&app, "GET", &format!("/jobs/{job_id}"), None, Some(&alice)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["companyName"], "companyX");
}

#[tokio::test]
async fn test_update_and_delete_by_owner() {
    let app = spawn_app().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;
    add_job(&app, &cookie, "Acme", "2024-01-10").await;

    let reply = send(&app, "GET", "/jobs", None, Some(&cookie)).await;
    let job_id = reply.body["data"][0]["id"].as_i64().unwrap();

    let mut change = job("Acme Corp", "2024-01-10");
    change["status"] = json!("INTERVIEWING");
    change["comment"] = json!("first round booked");
    let reply = send(
        &app,
        "PUT",
        &format!("/jobs/{job_id}"),
        Some(change),
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["companyName"], "Acme Corp");
    assert_eq!(reply.body["data"]["status"], "INTERVIEWING");
    assert_eq!(reply.body["data"]["comment"], "first round booked");

    let reply = send(&app, "DELETE", &format!("/jobs/{job_id}"), None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body["data"]["message"],
        "Job details deleted successfully"
    );

    let reply = send(&app, "GET", &format!("/jobs/{job_id}"), None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_job_validation() {
    let app = spawn_app().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;

    let reply = send(
        &app,
        "POST",
        "/jobs",
        Some(json!({ "companyName": "A", "jobRole": "  " })),
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let message = reply.body["error"]["message"].as_str().unwrap();
    assert!(message.contains("Company name must be between 2 and 100 characters"));
    assert!(message.contains("Job role is required"));
    assert!(message.contains("Job status is required"));
    assert!(message.contains("Applied date is required"));

    let reply = send(
        &app,
        "POST",
        "/jobs",
        Some(job("Acme", "2999-01-01")),
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["error"]["message"],
        "Applied date cannot be in the future"
    );

    let reply = send(
        &app,
        "POST",
        "/jobs",
        Some(json!({ "companyName": "Acme", "status": "GHOSTED" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["status"], 400);

    let reply = send(&app, "GET", "/jobs/abc", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&app, "GET", "/jobs/0", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_padding_does_not_satisfy_length_rules() {
    let app = spawn_app().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;

    let mut padded = job("  A  ", "2024-01-10");
    padded["jobRole"] = json!("  B  ");
    let reply = send(&app, "POST", "/jobs", Some(padded), Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["error"]["message"],
        "Company name must be between 2 and 100 characters, \
         Job role must be between 2 and 100 characters"
    );

    let reply = send(&app, "GET", "/jobs", None, Some(&cookie)).await;
    assert!(reply.body["data"].as_array().unwrap().is_empty());

    add_job(&app, &cookie, "  Acme  ", "2024-01-10").await;
    let reply = send(&app, "GET", "/jobs", None, Some(&cookie)).await;
    assert_eq!(reply.body["data"][0]["companyName"], "Acme");
}

#[tokio::test]
async fn test_pagination() {
    let app = spawn_app().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;
    for i in 0..12 {
        add_job(&app, &cookie, &format!("Company {i:02}"), "2024-01-10").await;
    }

    let first = send(&app, "GET", "/jobs", None, Some(&cookie)).await;
    let first = first.body["data"].as_array().unwrap().clone();
    assert_eq!(first.len(), 10);
    assert_eq!(first[0]["companyName"], "Company 00");

    let again = send(&app, "GET", "/jobs?page=0", None, Some(&cookie)).await;
    assert_eq!(again.body["data"].as_array().unwrap(), &first);

    let second = send(&app, "GET", "/jobs?page=1", None, Some(&cookie)).await;
    assert_eq!(second.body["data"].as_array().unwrap().len(), 2);

    let beyond = send(&app, "GET", "/jobs?page=5", None, Some(&cookie)).await;
    assert_eq!(beyond.status, StatusCode::OK);
    assert!(beyond.body["data"].as_array().unwrap().is_empty());

    let negative = send(&app, "GET", "/jobs?page=-1", None, Some(&cookie)).await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    for page in ["4611686018427387904", "9223372036854775807"] {
        let huge = send(&app, "GET", &format!("/jobs?page={page}"), None, Some(&cookie)).await;
        assert_eq!(huge.status, StatusCode::BAD_REQUEST, "{page}");
        assert_eq!(huge.body["error"]["status"], 400);
    }

    let reply = send(&app, "GET", "/user", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_date_range_filter() {
    let app = spawn_app().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;
    for date in ["2024-01-01", "2024-01-15", "2024-01-31", "2024-02-15"] {
        add_job(&app, &cookie, "Acme", date).await;
    }

    let reply = send(
        &app,
        "GET",
        "/jobs/between?from=2024-01-15&to=2024-01-31",
        None,
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let dates: Vec<_> = reply.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["appliedDate"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, vec!["2024-01-15", "2024-01-31"]);

    let reply = send(
        &app,
        "GET",
        "/jobs/between?from=2024-02-01&to=2024-01-01",
        None,
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["data"].as_array().unwrap().is_empty());

    let reply = send(&app, "GET", "/jobs/between?from=2024-01-01", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(
        &app,
        "GET",
        "/jobs/between?from=01-01-2024&to=2024-02-01",
        None,
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_company_and_status_filters() {
    let app = spawn_app().await;
    let alice = login_as(&app, "Alice", "alice@example.com").await;
    let bob = login_as(&app, "Bob", "bob@example.com").await;

    add_job(&app, &alice, "Acme", "2024-01-10").await;
    add_job(&app, &alice, "Globex", "2024-01-11").await;
    add_job(&app, &bob, "Acme", "2024-01-12").await;

    let reply = send(&app, "GET", "/jobs/company/Acme", None, Some(&alice)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let hits = reply.body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["appliedDate"], "2024-01-10");

    let reply = send(&app, "GET", "/jobs?status=APPLIED", None, Some(&alice)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 2);

    let reply = send(&app, "GET", "/jobs?status=on_hold", None, Some(&alice)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["data"].as_array().unwrap().is_empty());

    let reply = send(&app, "GET", "/jobs?status=GHOSTED", None, Some(&alice)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;

    let reply = send(&app, "GET", "/user", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, "POST", "/auth/logout", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, "GET", "/user", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, "POST", "/auth/logout", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_response_headers_and_fallback() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");

    // Recorder is not installed in tests.
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_span_carries_user_id() {
    let captured = Captured::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(captured.clone()));

    let app = spawn_app().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;
    let reply = send(&app, "GET", "/user", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let user_id = reply.body["data"]["id"].as_i64().unwrap().to_string();

    let recorded = captured.user_ids.lock().unwrap().clone();
    assert!(
        recorded.contains(&("request".to_string(), user_id)),
        "{recorded:?}"
    );
}

#[tokio::test]
async fn test_session_of_removed_account_is_rejected_and_flush_failure_logged() {
    let captured = Captured::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(captured.clone()));

    let (app, state) = spawn_app_with_state().await;
    let cookie = login_as(&app, "Ada", "ada@example.com").await;

    let conn = &state.shared.store.conn;
    conn.execute_unprepared("DELETE FROM users WHERE email = 'ada@example.com'")
        .await
        .unwrap();
    conn.execute_unprepared(
        "CREATE TRIGGER keep_sessions BEFORE DELETE ON tower_sessions \
         BEGIN SELECT RAISE(ABORT, 'sessions are read-only'); END",
    )
    .await
    .unwrap();

    let reply = send(&app, "GET", "/user", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let warnings = captured.warnings.lock().unwrap().clone();
    assert!(
        warnings.iter().any(|w| w.starts_with("Failed to flush session")),
        "{warnings:?}"
    );
}
