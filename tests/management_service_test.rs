//! Tests for the management API services: component, story and asset creation.

use std::fs;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use tempfile::TempDir;

use blokctl::application::services::{AssetService, ComponentService, StoryService};
use blokctl::application::ApplicationError;
use blokctl::config::Settings;
use blokctl::domain::{ComponentSchema, StoryDraft};
use blokctl::infrastructure::traits::{Method, RealFileSystem, RequestBody};
use blokctl::util::testing::FakeTransport;

fn settings() -> Arc<Settings> {
    Arc::new(Settings {
        space_id: "1234".to_string(),
        management_token: Some("mgmt-token".to_string()),
        ..Settings::default()
    })
}

fn json_body(body: &RequestBody) -> &Value {
    match body {
        RequestBody::Json(value) => value,
        other => panic!("expected JSON body, got {other:?}"),
    }
}

// ============================================================
// ComponentService
// ============================================================

#[test]
fn given_blog_post_schema_when_creating_component_then_posts_schema_with_bearer() {
    let http = Arc::new(
        FakeTransport::new().respond(201, r#"{"component":{"id":77,"name":"blog_post"}}"#),
    );
    let service = ComponentService::new(settings(), http.clone());

    let created = service
        .create(&ComponentSchema::blog_post())
        .expect("create component");

    assert_eq!(created.id, Some(77));
    assert_eq!(created.name, "blog_post");

    let request = &http.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://mapi.storyblok.com/v1/spaces/1234/components");
    assert_eq!(request.header_value("authorization"), Some("Bearer mgmt-token"));

    let body = json_body(&request.body);
    let component = &body["component"];
    assert_eq!(component["name"], "blog_post");
    assert_eq!(component["is_root"], true);
    assert_eq!(component["is_nestable"], false);
    assert_eq!(component["schema"]["title"]["type"], "text");
    assert_eq!(component["schema"]["title"]["required"], true);
    assert_eq!(component["schema"]["featured_image"]["type"], "asset");
    assert_eq!(component["schema"]["featured_image"]["filetypes"], json!(["images"]));
    assert_eq!(component["schema"]["publish_date"]["type"], "date");
    let fields: Vec<&String> = component["schema"]
        .as_object()
        .map(|o| o.keys().collect())
        .unwrap_or_default();
    assert_eq!(
        fields,
        vec!["title", "slug", "excerpt", "content", "featured_image", "author", "publish_date"]
    );
}

#[test]
fn given_duplicate_component_when_creating_then_api_error_with_message() {
    let http = Arc::new(
        FakeTransport::new().respond(422, r#"{"error":{"message":"Component already exists"}}"#),
    );
    let service = ComponentService::new(settings(), http);

    let err = service.create(&ComponentSchema::blog_post()).unwrap_err();

    match err {
        ApplicationError::Api { status, message, .. } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Component already exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_missing_management_token_when_creating_then_no_request_sent() {
    let http = Arc::new(FakeTransport::new());
    let service = ComponentService::new(Arc::new(Settings::default()), http.clone());

    let err = service.create(&ComponentSchema::blog_post()).unwrap_err();

    assert!(matches!(err, ApplicationError::MissingToken { .. }));
    assert!(http.requests().is_empty());
}

// ============================================================
// StoryService
// ============================================================

#[test]
fn given_draft_when_creating_story_then_posts_story_and_publish_flag() {
    let http = Arc::new(FakeTransport::new().respond(
        201,
        r#"{"story":{"id":9001,"uuid":"ab-cd","name":"My First Blog Post","slug":"my-first-blog-post","full_slug":"my-first-blog-post"}}"#,
    ));
    let service = StoryService::new(settings(), http.clone());
    let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    let draft = StoryDraft::sample_blog_post(date).with_featured_image(Some("cat.jpg".into()));

    let story = service.create(&draft, true).expect("create story");

    assert_eq!(story.id, Some(9001));
    assert_eq!(story.uuid.as_deref(), Some("ab-cd"));

    let request = &http.requests()[0];
    assert_eq!(request.url, "https://mapi.storyblok.com/v1/spaces/1234/stories");
    assert_eq!(request.header_value("Authorization"), Some("Bearer mgmt-token"));

    let body = json_body(&request.body);
    assert_eq!(body["publish"], 1);
    assert_eq!(body["story"]["name"], "My First Blog Post");
    assert_eq!(body["story"]["slug"], "my-first-blog-post");
    let content = &body["story"]["content"];
    assert_eq!(content["component"], "blog_post");
    assert_eq!(content["publish_date"], "2026-03-14");
    assert_eq!(content["author"], "John Doe");
    assert_eq!(content["featured_image"], "cat.jpg");
    assert_eq!(content["content"]["type"], "doc");
    assert_eq!(content["content"]["content"][0]["type"], "paragraph");
}

#[test]
fn given_no_image_when_creating_draft_story_then_omits_featured_image() {
    let http = Arc::new(FakeTransport::new().respond(201, r#"{"story":{"id":1,"name":"x"}}"#));
    let service = StoryService::new(settings(), http.clone());
    let draft = StoryDraft::sample_blog_post(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

    service.create(&draft, false).expect("create story");

    let body = json_body(&http.requests()[0].body).clone();
    assert_eq!(body["publish"], 0);
    assert!(body["story"]["content"].get("featured_image").is_none());
}

#[test]
fn given_space_in_us_region_when_creating_story_then_uses_regional_endpoint() {
    let http = Arc::new(FakeTransport::new().respond(201, r#"{"story":{"id":1}}"#));
    let us = Arc::new(Settings {
        region: "us".parse().unwrap(),
        ..(*settings()).clone()
    });
    let service = StoryService::new(us, http.clone());

    service
        .create(
            &StoryDraft::sample_blog_post(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
            false,
        )
        .expect("create story");

    assert_eq!(
        http.requests()[0].url,
        "https://api-us.storyblok.com/v1/spaces/1234/stories"
    );
}

// ============================================================
// AssetService
// ============================================================

#[test]
fn given_image_file_when_uploading_then_sends_multipart_file_part() {
    let temp = TempDir::new().unwrap();
    let image = temp.path().join("cat.png");
    fs::write(&image, b"\x89PNG fake").unwrap();
    let http = Arc::new(FakeTransport::new().respond(
        201,
        r#"{"id":5,"filename":"https://a.storyblok.com/f/1234/cat.png","pretty_url":"//a.storyblok.com/f/1234/cat.png"}"#,
    ));
    let service = AssetService::new(settings(), Arc::new(RealFileSystem), http.clone());

    let asset = service.upload(&image).expect("upload");

    assert_eq!(asset.id, Some(5));
    assert_eq!(asset.filename, "https://a.storyblok.com/f/1234/cat.png");
    assert!(asset.pretty_url.is_some());

    let request = &http.requests()[0];
    assert_eq!(request.url, "https://mapi.storyblok.com/v1/spaces/1234/assets");
    assert_eq!(request.header_value("authorization"), Some("Bearer mgmt-token"));
    match &request.body {
        RequestBody::Multipart {
            field,
            filename,
            content_type,
            bytes,
        } => {
            assert_eq!(field, "file");
            assert_eq!(filename, "cat.png");
            assert_eq!(content_type, "image/png");
            assert_eq!(bytes, b"\x89PNG fake");
        }
        other => panic!("expected multipart body, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn given_symlinked_image_when_uploading_then_uses_link_name() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("IMG_0042.png");
    fs::write(&target, b"\x89PNG target").unwrap();
    let link = temp.path().join("cover.jpg");
    std::os::unix::fs::symlink(&target, &link).unwrap();
    let http = Arc::new(FakeTransport::new().respond(
        201,
        r#"{"id":6,"filename":"https://a.storyblok.com/f/1234/cover.jpg"}"#,
    ));
    let service = AssetService::new(settings(), Arc::new(RealFileSystem), http.clone());

    service.upload(&link).expect("upload");

    match &http.requests()[0].body {
        RequestBody::Multipart {
            filename,
            content_type,
            bytes,
            ..
        } => {
            assert_eq!(filename, "cover.jpg");
            assert_eq!(content_type, "image/jpeg");
            assert_eq!(bytes, b"\x89PNG target");
        }
        other => panic!("expected multipart body, got {other:?}"),
    }
}

#[test]
fn given_missing_file_when_uploading_then_asset_not_found_and_no_request() {
    let temp = TempDir::new().unwrap();
    let http = Arc::new(FakeTransport::new());
    let service = AssetService::new(settings(), Arc::new(RealFileSystem), http.clone());

    let err = service.upload(&temp.path().join("nope.jpg")).unwrap_err();

    assert!(matches!(err, ApplicationError::AssetNotFound(_)));
    assert!(http.requests().is_empty());
}

#[test]
fn given_rejected_upload_when_uploading_then_api_error() {
    let temp = TempDir::new().unwrap();
    let image = temp.path().join("cat.jpg");
    fs::write(&image, b"JPEG").unwrap();
    let http = Arc::new(FakeTransport::new().respond(401, ""));
    let service = AssetService::new(settings(), Arc::new(RealFileSystem), http);

    let err = service.upload(&image).unwrap_err();

    match err {
        ApplicationError::Api { status, message, .. } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
