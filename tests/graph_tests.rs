mod auth_support;

use std::sync::Arc;

use serde_json::json;
use tcli::api::{ApiClient, ApiError};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_support::{test_client, StaticTokenSource};

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(Arc::new(StaticTokenSource::ok("token-1")))
        .with_base_url(server.uri())
        .with_http_client(test_client())
}

#[tokio::test]
async fn chats_are_collected_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/chats"))
        .and(query_param("$expand", "members"))
        .and(query_param("$top", "50"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "id": "19:a@thread.v2", "topic": "Release", "chatType": "group", "members": [] },
                {
                    "id": "19:b@unq.gbl.spaces",
                    "topic": null,
                    "chatType": "oneOnOne",
                    "members": [
                        { "displayName": "Alice", "email": "alice@example.com" },
                        { "displayName": "Bob", "email": null }
                    ]
                }
            ],
            "@odata.nextLink": format!("{}/me/chats?$skiptoken=abc", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me/chats"))
        .and(query_param("$skiptoken", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "id": "19:c@thread.v2", "chatType": "group", "members": [{ "displayName": "" }] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let chats = api(&server)
        .list_chats(&CancellationToken::new())
        .await
        .expect("chats");

    let listed: Vec<(&str, String)> = chats
        .iter()
        .map(|chat| (chat.id.as_str(), chat.display_name()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("19:a@thread.v2", "Release".to_string()),
            ("19:b@unq.gbl.spaces", "Alice, Bob".to_string()),
            ("19:c@thread.v2", "(unnamed)".to_string()),
        ]
    );
}

#[tokio::test]
async fn empty_listing_is_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let chats = api(&server)
        .list_chats(&CancellationToken::new())
        .await
        .expect("chats");
    assert!(chats.is_empty());
}

#[tokio::test]
async fn next_links_off_the_graph_host_are_not_followed() {
    let server = MockServer::start().await;
    let foreign = [
        "https://evil.example.com/me/chats?$skiptoken=abc".to_string(),
        // Same host prefix, different port.
        format!("{}0/me/chats?$skiptoken=abc", server.uri()),
    ];
    for link in foreign {
        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/me/chats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "id": "19:a@thread.v2", "chatType": "group" }],
                "@odata.nextLink": link.clone()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = api(&server)
            .list_chats(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(
            matches!(&err, ApiError::UnexpectedNextLink(got) if *got == link),
            "got {err:?}"
        );
    }
}

#[tokio::test]
async fn failing_second_page_fails_the_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/chats"))
        .and(query_param("$top", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "id": "19:a@thread.v2", "chatType": "group" }],
            "@odata.nextLink": format!("{}/me/chats?$skiptoken=abc", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me/chats"))
        .and(query_param("$skiptoken", "abc"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": "Forbidden", "message": "Missing scope" }
        })))
        .mount(&server)
        .await;

    let err = api(&server)
        .list_chats(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::PermissionDenied(_)), "got {err:?}");
}

#[tokio::test]
async fn send_posts_the_content_to_the_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/chats/19:abc@thread.v2/messages"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_json(json!({ "body": { "content": "Hello from the CLI" } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "1700000000000",
            "createdDateTime": "2026-10-19T09:30:00.000Z",
            "body": { "contentType": "text", "content": "Hello from the CLI" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sent = api(&server)
        .send_message("19:abc@thread.v2", "Hello from the CLI", &CancellationToken::new())
        .await
        .expect("sent");
    assert_eq!(sent.id, "1700000000000");
    assert_eq!(sent.created_at, "2026-10-19T09:30:00.000Z");
}

#[tokio::test]
async fn send_to_unknown_chat_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/chats/missing/messages"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "NotFound", "message": "Chat not found." }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = api(&server)
        .send_message("missing", "hi", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Provider(_)), "got {err:?}");
    let text = err.to_string();
    assert!(text.contains("NotFound"), "{text}");
    assert!(text.contains("Chat not found."), "{text}");
}
