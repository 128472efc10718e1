// tests/github_contents.rs
//! The GitHub sink against a scripted contents API.

mod common;

use base64::Engine as _;
use chrono::NaiveDate;
use common::{HttpStub, StubReply};
use notion2post::formatting::post_path;
use notion2post::{GitHubContentsSink, PublishError, PublishSink, RepoSlug, SecretToken};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sink(stub: &HttpStub, branch: Option<&str>) -> GitHubContentsSink {
    GitHubContentsSink::new(
        &stub.base_url,
        RepoSlug::parse("octo/blog").unwrap(),
        SecretToken::new("ghp_test_token").unwrap(),
        branch.map(str::to_string),
    )
    .unwrap()
}

#[tokio::test]
async fn existing_file_is_updated_with_its_sha() {
    let stub = HttpStub::spawn(|request| match request.method.as_str() {
        "GET" => StubReply::json(200, json!({ "sha": "abc123", "path": "_posts/a.md" })),
        _ => StubReply::json(
            200,
            json!({ "content": { "html_url": "https://github.com/octo/blog/blob/main/_posts/a.md" } }),
        ),
    });

    let location = sink(&stub, Some("main"))
        .upsert("_posts/a.md", "# Hi\n", "Add new blog post: _posts/a.md")
        .await
        .unwrap();

    assert_eq!(location, "https://github.com/octo/blog/blob/main/_posts/a.md");
    let requests = stub.requests();
    assert_eq!(requests.len(), 2);

    let lookup = &requests[0];
    assert_eq!(lookup.method, "GET");
    assert_eq!(lookup.path(), "/repos/octo/blog/contents/_posts/a.md");
    assert!(lookup.url.contains("ref=main"));
    assert_eq!(lookup.header("Authorization"), Some("token ghp_test_token"));

    let put = &requests[1];
    assert_eq!(put.method, "PUT");
    let body = put.json();
    assert_eq!(body["sha"], "abc123");
    assert_eq!(body["branch"], "main");
    assert_eq!(body["message"], "Add new blog post: _posts/a.md");
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(body["content"].as_str().unwrap())
        .unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "# Hi\n");
}

#[tokio::test]
async fn missing_file_is_created_without_sha() {
    let stub = HttpStub::spawn(|request| match request.method.as_str() {
        "GET" => StubReply::json(404, json!({ "message": "Not Found" })),
        _ => StubReply::json(201, json!({ "content": {} })),
    });

    let location = sink(&stub, None)
        .upsert("_posts/new.md", "body", "Add new blog post: _posts/new.md")
        .await
        .unwrap();

    assert_eq!(location, "octo/blog:_posts/new.md");
    let requests = stub.requests();
    assert!(!requests[0].url.contains("ref="));
    let body = requests[1].json();
    assert!(body.get("sha").is_none());
    assert!(body.get("branch").is_none());
}

#[tokio::test]
async fn failed_lookup_stops_before_writing() {
    let stub = HttpStub::spawn(|_| StubReply::json(500, json!({ "message": "boom" })));

    let err = sink(&stub, None)
        .upsert("_posts/a.md", "x", "msg")
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::VersionLookup { status: 500, .. }));
    assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn rejected_write_is_reported() {
    let stub = HttpStub::spawn(|request| match request.method.as_str() {
        "GET" => StubReply::json(404, json!({})),
        _ => StubReply::json(409, json!({ "message": "sha does not match" })),
    });

    let err = sink(&stub, None)
        .upsert("_posts/a.md", "x", "msg")
        .await
        .unwrap_err();

    match err {
        PublishError::Rejected { status, body, path } => {
            assert_eq!(status, 409);
            assert_eq!(path, "_posts/a.md");
            assert!(body.contains("sha does not match"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn reserved_characters_in_titles_are_percent_encoded() {
    let stub = HttpStub::spawn(|request| match request.method.as_str() {
        "GET" => StubReply::json(404, json!({ "message": "Not Found" })),
        _ => StubReply::json(201, json!({ "content": {} })),
    });
    let sink = sink(&stub, Some("main"));
    let timestamp = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();

    for title in ["C# Basics", "Why? Notes"] {
        let path = post_path("_posts", timestamp, title);
        let location = sink
            .upsert(&path, "body", &format!("Add new blog post: {}", path))
            .await
            .unwrap();
        assert_eq!(location, format!("octo/blog:{}", path));
    }

    let requests = stub.requests();
    assert_eq!(requests.len(), 4);
    let expected = [
        ("GET", "/repos/octo/blog/contents/_posts/2024-01-15-C%23-Basics.md"),
        ("PUT", "/repos/octo/blog/contents/_posts/2024-01-15-C%23-Basics.md"),
        ("GET", "/repos/octo/blog/contents/_posts/2024-01-15-Why%3F-Notes.md"),
        ("PUT", "/repos/octo/blog/contents/_posts/2024-01-15-Why%3F-Notes.md"),
    ];
    for (request, (method, path)) in requests.iter().zip(expected) {
        assert_eq!(request.method, method);
        assert_eq!(request.path(), path);
    }
    assert!(requests[0].url.ends_with("?ref=main"));
    assert_eq!(
        requests[1].json()["message"],
        "Add new blog post: _posts/2024-01-15-C#-Basics.md"
    );
}
