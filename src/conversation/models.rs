use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageState {
    Draft,
    Sent,
    Other(String),
}

impl From<String> for MessageState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "DRAFT" => Self::Draft,
            "SENT" => Self::Sent,
            _ => Self::Other(value),
        }
    }
}

impl From<MessageState> for String {
    fn from(value: MessageState) -> Self {
        value.as_str().to_string()
    }
}

impl MessageState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Other(value) => value,
        }
    }
}

/// A conversation message. Display names, the sender/recipient name
/// projections and attachments are derived once when the message is built.
/// It serializes back to the service's shape, so a saved message reads back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMessage", into = "RawMessage")]
pub struct Message {
    id: String,
    subject: Option<String>,
    from: String,
    state: MessageState,
    to: Vec<String>,
    cc: Vec<String>,
    cc_name: Option<Vec<String>>,
    cci: Vec<String>,
    cci_name: Option<Vec<String>>,
    display_names: BTreeMap<String, String>,
    date: i64,
    unread: bool,
    response: Option<bool>,
    count: Option<u32>,
    has_attachment: Option<bool>,
    body: Option<String>,
    attachments: Vec<MessageAttachment>,
    from_name: Option<String>,
    to_name: String,
}

impl Message {
    /// Builds the client-side copy of a draft the service just created.
    pub fn new_draft(
        id: impl Into<String>,
        from: impl Into<String>,
        draft: &MessageDraft,
        date: i64,
    ) -> Self {
        RawMessage {
            id: id.into(),
            subject: Some(draft.subject.clone()),
            from: from.into(),
            state: MessageState::Draft,
            to: draft.to.clone(),
            cc: draft.cc.clone(),
            cc_name: None,
            cci: draft.cci.clone(),
            cci_name: None,
            display_names: Vec::new(),
            date,
            unread: false,
            response: None,
            count: None,
            has_attachment: Some(false),
            body: Some(draft.body.clone()),
            attachments: None,
        }
        .into()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Sender's user id.
    pub fn sender(&self) -> &str {
        &self.from
    }

    pub fn state(&self) -> &MessageState {
        &self.state
    }

    pub fn is_draft(&self) -> bool {
        self.state == MessageState::Draft
    }

    pub fn to(&self) -> &[String] {
        &self.to
    }

    pub fn cc(&self) -> &[String] {
        &self.cc
    }

    pub fn cci(&self) -> &[String] {
        &self.cci
    }

    pub fn cc_names(&self) -> Option<&[String]> {
        self.cc_name.as_deref()
    }

    pub fn cci_names(&self) -> Option<&[String]> {
        self.cci_name.as_deref()
    }

    pub fn display_names(&self) -> &BTreeMap<String, String> {
        &self.display_names
    }

    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.display_names.get(user_id).map(String::as_str)
    }

    /// Milliseconds since the Unix epoch.
    pub fn date_millis(&self) -> i64 {
        self.date
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.date)
    }

    pub fn is_unread(&self) -> bool {
        self.unread
    }

    pub fn is_response(&self) -> Option<bool> {
        self.response
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    pub fn has_attachment(&self) -> Option<bool> {
        self.has_attachment
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn attachments(&self) -> &[MessageAttachment] {
        &self.attachments
    }

    pub fn attachment(&self, attachment_id: &str) -> Option<&MessageAttachment> {
        self.attachments
            .iter()
            .find(|attachment| attachment.id == attachment_id)
    }

    pub fn from_name(&self) -> Option<&str> {
        self.from_name.as_deref()
    }

    /// Primary recipients' names joined with `, `; ids stand in for unknown names.
    pub fn to_name(&self) -> &str {
        &self.to_name
    }

    /// The `{body, subject, to, cc, cci}` body used by draft update and send.
    pub fn to_payload(&self) -> MessageDraft {
        MessageDraft::from(self)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    id: String,
    #[serde(default)]
    subject: Option<String>,
    from: String,
    state: MessageState,
    to: Vec<String>,
    cc: Vec<String>,
    #[serde(default)]
    cc_name: Option<Vec<String>>,
    cci: Vec<String>,
    #[serde(default)]
    cci_name: Option<Vec<String>>,
    display_names: Vec<Vec<serde_json::Value>>,
    date: i64,
    #[serde(default)]
    unread: bool,
    #[serde(default)]
    response: Option<bool>,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    has_attachment: Option<bool>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    attachments: Option<Vec<RawMessageAttachment>>,
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        let display_names = raw
            .display_names
            .iter()
            .filter_map(|entry| match entry.as_slice() {
                [id, name, ..] => Some((id.as_str()?.to_string(), name.as_str()?.to_string())),
                _ => None,
            })
            .collect::<BTreeMap<_, _>>();

        let from_name = display_names.get(&raw.from).cloned();
        let to_name = raw
            .to
            .iter()
            .map(|id| display_names.get(id).map_or(id.as_str(), String::as_str))
            .collect::<Vec<_>>()
            .join(", ");

        let attachments = raw
            .attachments
            .unwrap_or_default()
            .into_iter()
            .map(|attachment| attachment.into_attachment(&raw.id))
            .collect();

        Self {
            id: raw.id,
            subject: raw.subject,
            from: raw.from,
            state: raw.state,
            to: raw.to,
            cc: raw.cc,
            cc_name: raw.cc_name,
            cci: raw.cci,
            cci_name: raw.cci_name,
            display_names,
            date: raw.date,
            unread: raw.unread,
            response: raw.response,
            count: raw.count,
            has_attachment: raw.has_attachment,
            body: raw.body,
            attachments,
            from_name,
            to_name,
        }
    }
}

impl From<Message> for RawMessage {
    fn from(message: Message) -> Self {
        let display_names = message
            .display_names
            .into_iter()
            .map(|(id, name)| vec![id.into(), name.into()])
            .collect();

        Self {
            id: message.id,
            subject: message.subject,
            from: message.from,
            state: message.state,
            to: message.to,
            cc: message.cc,
            cc_name: message.cc_name,
            cci: message.cci,
            cci_name: message.cci_name,
            display_names,
            date: message.date,
            unread: message.unread,
            response: message.response,
            count: message.count,
            has_attachment: message.has_attachment,
            body: message.body,
            attachments: Some(
                message
                    .attachments
                    .into_iter()
                    .map(RawMessageAttachment::from)
                    .collect(),
            ),
        }
    }
}

/// An attachment of one message; `message_id` locates it for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAttachment {
    pub id: String,
    pub message_id: String,
    pub name: String,
    pub filename: String,
    pub charset: Option<String>,
    pub content_type: Option<String>,
    pub content_transfer_encoding: Option<String>,
    pub size: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessageAttachment {
    id: String,
    #[serde(default)]
    name: Option<String>,
    filename: String,
    #[serde(default)]
    charset: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    content_transfer_encoding: Option<String>,
    #[serde(default)]
    size: u64,
}

impl From<MessageAttachment> for RawMessageAttachment {
    fn from(attachment: MessageAttachment) -> Self {
        Self {
            id: attachment.id,
            name: Some(attachment.name),
            filename: attachment.filename,
            charset: attachment.charset,
            content_type: attachment.content_type,
            content_transfer_encoding: attachment.content_transfer_encoding,
            size: attachment.size,
        }
    }
}

impl RawMessageAttachment {
    fn into_attachment(self, message_id: &str) -> MessageAttachment {
        MessageAttachment {
            name: self.name.unwrap_or_else(|| self.filename.clone()),
            id: self.id,
            message_id: message_id.to_string(),
            filename: self.filename,
            charset: self.charset,
            content_type: self.content_type,
            content_transfer_encoding: self.content_transfer_encoding,
            size: self.size,
        }
    }
}

/// Content of a message to create, update or send. `cci` holds the blind
/// carbon copy recipients under the service's field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageDraft {
    pub body: String,
    pub subject: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub cci: Vec<String>,
}

impl MessageDraft {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn to<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to = recipients.into_iter().map(Into::into).collect();
        self
    }

    pub fn cc<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cc = recipients.into_iter().map(Into::into).collect();
        self
    }

    pub fn cci<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cci = recipients.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&Message> for MessageDraft {
    fn from(message: &Message) -> Self {
        Self {
            body: message.body.clone().unwrap_or_default(),
            subject: message.subject.clone().unwrap_or_default(),
            to: message.to.clone(),
            cc: message.cc.clone(),
            cci: message.cci.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationFolder {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub depth: u16,
    pub name: String,
    #[serde(rename = "nbUnread", default)]
    pub unread_count: u32,
    #[serde(rename = "skip_uniq", default)]
    pub skip_unique: Option<bool>,
    #[serde(default)]
    pub trashed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationUser {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub group_display_name: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub structure_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group_display_name: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub structure_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = r#"{
        "id": "m-1",
        "subject": "Sortie scolaire",
        "from": "u1",
        "state": "SENT",
        "to": ["u2", "u3"],
        "cc": [],
        "cci": [],
        "displayNames": [["u1", "Alice"], ["u2", "Bob"], ["g1", "Parents", null]],
        "date": 1700000000000,
        "unread": true,
        "hasAttachment": true,
        "attachments": [
            {"id": "a-1", "name": "file", "filename": "autorisation.pdf",
             "contentType": "application/pdf", "size": 1024, "checksum": "ignored"}
        ],
        "systemFolders": ["INBOX"]
    }"#;

    fn message() -> Message {
        serde_json::from_str(MESSAGE).expect("message parses")
    }

    #[test]
    fn builds_display_name_map() {
        let message = message();
        assert_eq!(message.display_name("u1"), Some("Alice"));
        assert_eq!(message.display_name("u2"), Some("Bob"));
        assert_eq!(message.display_name("g1"), Some("Parents"));
        assert_eq!(message.display_names().len(), 3);
    }

    #[test]
    fn derives_sender_and_recipient_names() {
        let message = message();
        assert_eq!(message.from_name(), Some("Alice"));
        assert_eq!(message.to_name(), "Bob, u3");
    }

    #[test]
    fn attachments_point_back_to_message() {
        let message = message();
        let attachment = message.attachment("a-1").expect("attachment present");
        assert_eq!(attachment.message_id, "m-1");
        assert_eq!(attachment.filename, "autorisation.pdf");
        assert_eq!(attachment.size, 1024);
    }

    #[test]
    fn parses_state_and_date() {
        let message = message();
        assert_eq!(message.state(), &MessageState::Sent);
        assert!(!message.is_draft());
        assert!(message.is_unread());
        assert_eq!(
            message.date().map(|date| date.timestamp_millis()),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn serialized_message_reads_back() {
        let message = message();
        let json = serde_json::to_value(&message).expect("serializes");

        assert_eq!(json["displayNames"][0], serde_json::json!(["g1", "Parents"]));
        assert!(json.get("fromName").is_none());
        assert!(json.get("toName").is_none());
        assert!(json["attachments"][0].get("messageId").is_none());

        let reread: Message = serde_json::from_value(json).expect("reads back");
        assert_eq!(reread, message);
    }

    #[test]
    fn saved_draft_can_be_sent_later() {
        let draft = MessageDraft::new("s", "hi").to(["u1"]).cci(["u2"]);
        let message = Message::new_draft("d-1", "u0", &draft, 1_700_000_000_000);

        let saved = serde_json::to_string(&message).expect("serializes");
        let reread: Message = serde_json::from_str(&saved).expect("reads back");
        assert!(reread.is_draft());
        assert_eq!(reread.to_payload(), draft);
    }

    #[test]
    fn unknown_state_is_preserved() {
        let state = MessageState::from("RECALL".to_string());
        assert_eq!(state.as_str(), "RECALL");
        assert_eq!(String::from(state), "RECALL");
    }

    #[test]
    fn missing_sender_is_an_error() {
        let result = serde_json::from_str::<Message>(
            r#"{"id":"m","state":"SENT","to":[],"cc":[],"cci":[],"displayNames":[],"date":0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_draft_has_draft_defaults() {
        let draft = MessageDraft::new("s", "hi").to(["u1"]);
        let message = Message::new_draft("m1", "me", &draft, 42);

        assert_eq!(message.id(), "m1");
        assert!(message.is_draft());
        assert!(!message.is_unread());
        assert_eq!(message.to(), ["u1"]);
        assert_eq!(message.date_millis(), 42);
        assert_eq!(message.to_payload(), draft);
    }

    #[test]
    fn payload_uses_cci_field_name() {
        let payload = MessageDraft::new("s", "b").cci(["u9"]);
        assert_eq!(
            serde_json::to_value(&payload).expect("serializes"),
            serde_json::json!({"body": "b", "subject": "s", "to": [], "cc": [], "cci": ["u9"]})
        );
    }

    #[test]
    fn parses_folder_tree_fields() {
        let folder: ConversationFolder = serde_json::from_str(
            r#"{"id":"f2","parent_id":"f1","depth":2,"name":"Projets","nbUnread":4,"skip_uniq":null,"trashed":false}"#,
        )
        .expect("folder parses");
        assert_eq!(folder.parent_id.as_deref(), Some("f1"));
        assert_eq!(folder.depth, 2);
        assert_eq!(folder.unread_count, 4);
    }
}
