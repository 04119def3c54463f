#![allow(dead_code)]

use edifice::{ClientConfig, EdificeClient, UserInfo};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TOKEN_PATH: &str = "/auth/oauth2/token";
pub const USER_INFO_PATH: &str = "/auth/oauth2/userinfo";

pub fn client(server: &MockServer) -> EdificeClient {
    EdificeClient::new(ClientConfig::new(server.uri(), "app-id", "app-secret"))
        .expect("client builds")
}

pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({
        "token_type": "Bearer",
        "access_token": access,
        "refresh_token": refresh,
        "expires_in": 3600,
        "scope": "userinfo conversation"
    })
}

pub fn user_info_body() -> Value {
    json!({
        "userId": "u-1",
        "username": "Jean DUPONT",
        "login": "jean.dupont",
        "firstName": "Jean",
        "lastName": "DUPONT",
        "type": "Teacher",
        "schoolName": "College Victor Hugo"
    })
}

pub fn user_info() -> UserInfo {
    serde_json::from_value(user_info_body()).expect("userinfo parses")
}

pub fn message_body(id: &str, state: &str) -> Value {
    json!({
        "id": id,
        "subject": "Conseil de classe",
        "from": "u-2",
        "state": state,
        "to": ["u-1"],
        "cc": [],
        "cci": [],
        "displayNames": [["u-1", "Jean DUPONT"], ["u-2", "Marie CURIE"]],
        "date": 1700000000000i64,
        "unread": true,
        "body": "<p>Bonjour</p>",
        "attachments": []
    })
}
