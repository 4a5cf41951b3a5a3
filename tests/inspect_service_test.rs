//! Tests for StoryInspector against a scripted transport.

use std::sync::Arc;

use serde_json::json;

use blokctl::application::services::StoryInspector;
use blokctl::application::ApplicationError;
use blokctl::config::Settings;
use blokctl::domain::{DomainError, StoryVersion};
use blokctl::infrastructure::traits::Method;
use blokctl::util::testing::{init_test_setup, FakeTransport};

fn settings() -> Settings {
    Settings {
        delivery_token: Some("preview-token".to_string()),
        ..Settings::default()
    }
}

fn story_body() -> String {
    json!({
        "story": {
            "id": 42,
            "uuid": "9f1c",
            "name": "Mysore History",
            "slug": "mysore-history",
            "full_slug": "mysore/mysore-history",
            "content": {
                "component": "mysore",
                "name": "Mysore",
                "body": [
                    {"component": "teaser", "headline": "Welcome"},
                    {"component": "grid", "columns": [
                        {"component": "feature", "text": "A"},
                        {"component": "feature", "text": "B"}
                    ]}
                ]
            }
        }
    })
    .to_string()
}

fn inspector(settings: Settings, http: Arc<FakeTransport>) -> StoryInspector {
    StoryInspector::new(Arc::new(settings), http)
}

#[test]
fn given_story_when_inspecting_then_sends_delivery_request_and_lists_components() {
    init_test_setup();
    let http = Arc::new(FakeTransport::new().respond(200, &story_body()));
    let service = inspector(settings(), http.clone());

    let inspection = service
        .inspect("mysore/mysore-history", StoryVersion::Draft, 128, &[])
        .expect("inspect");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(
        request.url,
        "https://api.storyblok.com/v2/cdn/stories/mysore/mysore-history"
    );
    assert_eq!(request.query_value("version"), Some("draft"));
    assert_eq!(request.query_value("token"), Some("preview-token"));

    assert_eq!(inspection.story.name, "Mysore History");
    assert_eq!(inspection.story.full_slug, "mysore/mysore-history");
    assert_eq!(
        inspection.components.iter().collect::<Vec<_>>(),
        vec!["mysore", "teaser", "grid", "feature"]
    );
    assert!(inspection.missing.is_empty());
}

#[test]
fn given_registered_list_when_inspecting_then_reports_missing_in_discovery_order() {
    let http = Arc::new(FakeTransport::new().respond(200, &story_body()));
    let service = inspector(settings(), http);
    let registered = vec!["mysore".to_string(), "grid".to_string()];

    let inspection = service
        .inspect("mysore/mysore-history", StoryVersion::Published, 128, &registered)
        .expect("inspect");

    assert_eq!(inspection.missing, vec!["teaser", "feature"]);
}

#[test]
fn given_published_version_when_fetching_then_query_says_published() {
    let http = Arc::new(FakeTransport::new().respond(200, &story_body()));
    let service = inspector(settings(), http.clone());

    service
        .fetch_story("/mysore/mysore-history/", StoryVersion::Published)
        .expect("fetch");

    let request = &http.requests()[0];
    assert_eq!(request.query_value("version"), Some("published"));
    assert!(request.url.ends_with("/stories/mysore/mysore-history"));
}

#[test]
fn given_not_found_when_fetching_then_api_error_with_body_message() {
    let http = Arc::new(FakeTransport::new().respond(404, r#"{"error":"This record could not be found"}"#));
    let service = inspector(settings(), http);

    let err = service
        .fetch_story("missing/story", StoryVersion::Draft)
        .unwrap_err();

    match err {
        ApplicationError::Api { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "This record could not be found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_missing_delivery_token_when_fetching_then_no_request_sent() {
    let http = Arc::new(FakeTransport::new());
    let service = inspector(Settings::default(), http.clone());

    let err = service
        .fetch_story("mysore/mysore-history", StoryVersion::Draft)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::MissingToken { .. }));
    assert!(http.requests().is_empty());
}

#[test]
fn given_invalid_slug_when_fetching_then_domain_error() {
    let http = Arc::new(FakeTransport::new());
    let service = inspector(settings(), http.clone());

    let err = service.fetch_story("a//b", StoryVersion::Draft).unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(DomainError::InvalidSlug(_))));
    assert!(http.requests().is_empty());
}

#[test]
fn given_story_without_content_when_inspecting_then_no_components() {
    let body = json!({"story": {"name": "Empty", "slug": "empty", "full_slug": "empty"}}).to_string();
    let http = Arc::new(FakeTransport::new().respond(200, &body));
    let service = inspector(settings(), http);

    let inspection = service
        .inspect("empty", StoryVersion::Draft, 128, &[])
        .expect("inspect");

    assert!(inspection.components.is_empty());
}

#[test]
fn given_transport_failure_when_fetching_then_operation_failed() {
    let http = Arc::new(FakeTransport::new().fail("connection refused"));
    let service = inspector(settings(), http);

    let err = service
        .fetch_story("mysore/mysore-history", StoryVersion::Draft)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[test]
fn given_non_json_success_body_when_fetching_then_invalid_response() {
    let http = Arc::new(FakeTransport::new().respond(200, "<html>"));
    let service = inspector(settings(), http);

    let err = service
        .fetch_story("mysore/mysore-history", StoryVersion::Draft)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidResponse { .. }));
}
