mod common;

use chrono::Utc;
use edifice::conversation::MessageDraft;
use edifice::{AppError, EdificeClient, TokenPair};
use reqwest::StatusCode;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{
    any, body_json, body_string_contains, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{message_body, user_info};

async fn signed_in(server: &MockServer) -> EdificeClient {
    let client = common::client(server);
    client
        .restore_session(TokenPair::from_existing("access", "refresh"), Some(user_info()))
        .await;
    client
}

#[tokio::test]
async fn lists_folder_messages_with_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversation/list/INBOX"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer access"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([message_body("m-1", "SENT")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let messages = client
        .conversations()
        .folder_messages("INBOX", Some(2))
        .await
        .expect("folder lists");

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].from_name(), Some("Marie CURIE"));
    assert_eq!(messages[0].to_name(), "Jean DUPONT");
}

#[tokio::test]
async fn fetches_message_with_attachments() {
    let server = MockServer::start().await;
    let mut body = message_body("m-1", "SENT");
    body["attachments"] = json!([
        {"id": "a-1", "name": "file", "filename": "menu.pdf", "contentType": "application/pdf", "size": 4}
    ]);
    Mock::given(method("GET"))
        .and(path("/conversation/message/m-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conversation/message/m-1/attachment/a-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let conversations = client.conversations();
    let message = conversations.message("m-1").await.expect("message loads");
    let attachment = message.attachment("a-1").expect("attachment listed");

    let bytes = conversations
        .message_attachment(attachment)
        .await
        .expect("attachment downloads");
    assert_eq!(bytes, b"%PDF");
}

#[tokio::test]
async fn toggles_read_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversation/toggleUnread"))
        .and(body_json(json!({"id": ["m-1", "m-2"], "unread": false})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    client
        .conversations()
        .set_read_status_by_id(["m-1", "m-2"], true)
        .await
        .expect("status updated");
}

#[tokio::test]
async fn searches_visible_recipients() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversation/visible"))
        .and(query_param("search", "curie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [{"id": "g-1", "name": "Parents 6A"}],
            "users": [{"id": "u-2", "displayName": "Marie CURIE", "profile": "Teacher"}]
        })))
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let visible = client
        .conversations()
        .visible_recipients("curie")
        .await
        .expect("recipients load");

    assert_eq!(visible.groups[0].name, "Parents 6A");
    assert_eq!(visible.users[0].display_name, "Marie CURIE");
}

#[tokio::test]
async fn writes_draft_and_builds_local_copy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversation/draft"))
        .and(body_json(json!({
            "body": "<p>hi</p>",
            "subject": "Sortie",
            "to": ["u-2"],
            "cc": [],
            "cci": ["u-3"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "m1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let draft = MessageDraft::new("Sortie", "<p>hi</p>")
        .to(["u-2"])
        .cci(["u-3"]);
    let message = client
        .conversations()
        .write_draft_message(&draft)
        .await
        .expect("draft created");

    assert_eq!(message.id(), "m1");
    assert!(message.is_draft());
    assert!(!message.is_unread());
    let age = Utc::now().timestamp_millis() - message.date_millis();
    assert!((0..60_000).contains(&age), "draft dated {age} ms ago");
    assert_eq!(message.sender(), "u-1");
    assert_eq!(message.to_payload(), draft);
}

#[tokio::test]
async fn draft_requires_user_profile() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = common::client(&server);
    client
        .restore_session(TokenPair::from_existing("access", "refresh"), None)
        .await;
    let result = client
        .conversations()
        .write_draft_message(&MessageDraft::new("s", "b"))
        .await;
    assert!(matches!(result, Err(AppError::LocalState(_))));
}

#[tokio::test]
async fn sends_draft_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversation/draft"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "d-1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/conversation/send"))
        .and(query_param("id", "d-1"))
        .and(body_string_contains("\"subject\":\"Sortie\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "d-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let conversations = client.conversations();
    let draft = conversations
        .write_draft_message(&MessageDraft::new("Sortie", "b").to(["u-2"]))
        .await
        .expect("draft created");
    conversations
        .send_draft_message(&draft)
        .await
        .expect("draft sent");
}

#[tokio::test]
async fn sending_non_draft_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let message = serde_json::from_value(message_body("m-1", "SENT")).expect("message parses");
    let result = client.conversations().send_draft_message(&message).await;
    assert!(matches!(result, Err(AppError::LocalState(_))));
}

#[tokio::test]
async fn reply_carries_parent_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversation/send"))
        .and(query_param("In-Reply-To", "p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m-9"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    client
        .conversations()
        .send_reply(&MessageDraft::new("Re: x", "ok").to(["u-2"]), "p-1")
        .await
        .expect("reply sent");
}

#[tokio::test]
async fn upload_returns_attachment_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversation/message/m-1/attachment"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"notes.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "att-9",
            "filename": "notes.txt",
            "size": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let id = client
        .conversations()
        .upload_attachment_to("m-1", "notes.txt", b"hello".to_vec())
        .await
        .expect("upload succeeds");
    assert_eq!(id, "att-9");
}

#[tokio::test]
async fn trash_restore_and_empty() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/conversation/trash"))
        .and(body_json(json!({"id": ["m-1"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/conversation/restore"))
        .and(body_json(json!({"id": ["m-1"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/conversation/emptyTrash"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let conversations = client.conversations();
    conversations
        .move_to_trash_by_id(["m-1"])
        .await
        .expect("trashed");
    conversations
        .restore_from_trash_by_id(["m-1"])
        .await
        .expect("restored");
    conversations.empty_trash().await.expect("emptied");
}

#[tokio::test]
async fn html_error_page_becomes_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversation/message/m-1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("<html><body>Internal error</body></html>"),
        )
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let error = client
        .conversations()
        .message("m-1")
        .await
        .expect_err("server error");

    match error {
        AppError::Transport { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("Internal error"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn structured_error_body_becomes_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversation/message/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "conversation.not.found"})))
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let error = client
        .conversations()
        .message("missing")
        .await
        .expect_err("not found");
    assert_eq!(error.error_code(), Some("conversation.not.found"));
}

#[tokio::test]
async fn unexpected_shape_is_deserialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversation/max-depth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"depth": 3})))
        .mount(&server)
        .await;

    let client = signed_in(&server).await;
    let result = client.conversations().max_depth().await;
    assert!(matches!(result, Err(AppError::Deserialization(_))));
}

#[tokio::test]
async fn unreachable_instance_is_connectivity_error() {
    let client = EdificeClient::new(edifice::ClientConfig::new(
        "http://127.0.0.1:9",
        "app-id",
        "app-secret",
    ))
    .expect("client builds");
    client
        .restore_session(TokenPair::from_existing("access", "refresh"), None)
        .await;

    let error = client
        .conversations()
        .folders()
        .await
        .expect_err("nothing listens on port 9");
    assert!(matches!(error, AppError::Connectivity(_)));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn error_body_cut_short_is_connectivity_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("listener binds");
    let address = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\n<html>")
                .await;
        }
    });

    let client = EdificeClient::new(edifice::ClientConfig::new(
        format!("http://{address}"),
        "app-id",
        "app-secret",
    ))
    .expect("client builds");
    client
        .restore_session(TokenPair::from_existing("access", "refresh"), None)
        .await;

    let error = client
        .conversations()
        .message("m-1")
        .await
        .expect_err("connection closes mid-body");
    assert!(matches!(error, AppError::Connectivity(_)), "got {error:?}");
}
