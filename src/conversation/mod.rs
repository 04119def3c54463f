//! Conversation (internal messaging) operations.

pub mod models;

use chrono::Utc;

use crate::api::conversation as endpoints;
use crate::api::models::{
    IdResponse, MaxDepthResponse, MessageIdsRequest, ToggleUnreadRequest, VisibleRecipients,
};
use crate::api::resources::Params;
use crate::api::transport::{FilePart, Payload};
use crate::client::EdificeClient;
use crate::error::{AppError, AppResult};

pub use models::{
    ConversationFolder, ConversationGroup, ConversationUser, Message, MessageAttachment,
    MessageDraft, MessageState,
};

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, Copy)]
pub struct ConversationManager<'a> {
    client: &'a EdificeClient,
}

impl<'a> ConversationManager<'a> {
    pub(crate) fn new(client: &'a EdificeClient) -> Self {
        Self { client }
    }

    /// User-created folders; they form a tree through `parent_id`.
    pub async fn folders(&self) -> AppResult<Vec<ConversationFolder>> {
        self.client
            .call_json(&endpoints::LIST_FOLDERS, Params::new(), Payload::Empty)
            .await
    }

    /// Messages of a system folder (`INBOX`, `OUTBOX`, `DRAFT`, `TRASH`) or a
    /// user folder id.
    pub async fn folder_messages(&self, folder: &str, page: Option<u32>) -> AppResult<Vec<Message>> {
        let params = Params::new()
            .with(endpoints::FOLDER, folder)
            .with_opt(endpoints::PAGE, page.map(|page| page.to_string()));
        self.client
            .call_json(&endpoints::FOLDER_MESSAGES, params, Payload::Empty)
            .await
    }

    pub async fn message(&self, id: &str) -> AppResult<Message> {
        self.client
            .call_json(
                &endpoints::GET_MESSAGE,
                Params::new().with(endpoints::MESSAGE_ID, id),
                Payload::Empty,
            )
            .await
    }

    pub async fn message_attachment(&self, attachment: &MessageAttachment) -> AppResult<Vec<u8>> {
        self.attachment_bytes(&attachment.message_id, &attachment.id)
            .await
    }

    pub async fn attachment_bytes(&self, message_id: &str, attachment_id: &str) -> AppResult<Vec<u8>> {
        let params = Params::new()
            .with(endpoints::MESSAGE_ID, message_id)
            .with(endpoints::ATTACHMENT_ID, attachment_id);
        self.client
            .call_bytes(&endpoints::GET_ATTACHMENT, params, Payload::Empty)
            .await
    }

    pub async fn set_messages_read_status(&self, messages: &[Message], read: bool) -> AppResult<()> {
        self.set_read_status_by_id(messages.iter().map(Message::id), read)
            .await
    }

    pub async fn set_read_status_by_id(
        &self,
        ids: impl IntoIterator<Item = impl AsRef<str>>,
        read: bool,
    ) -> AppResult<()> {
        let body = ToggleUnreadRequest {
            id: collect_ids(ids)?,
            unread: !read,
        };
        self.client
            .call_empty(&endpoints::TOGGLE_UNREAD, Params::new(), Payload::json(&body)?)
            .await
    }

    pub async fn visible_recipients(&self, search: &str) -> AppResult<VisibleRecipients> {
        self.client
            .call_json(
                &endpoints::VISIBLE_RECIPIENTS,
                Params::new().with(endpoints::SEARCH, search),
                Payload::Empty,
            )
            .await
    }

    pub async fn max_depth(&self) -> AppResult<u32> {
        let response: MaxDepthResponse = self
            .client
            .call_json(&endpoints::MAX_DEPTH, Params::new(), Payload::Empty)
            .await?;
        Ok(response.max_depth)
    }

    /// Creates a draft and returns its client-side copy built from the
    /// returned id, without fetching it back.
    pub async fn write_draft_message(&self, draft: &MessageDraft) -> AppResult<Message> {
        let sender = self
            .client
            .user_info()
            .await
            .map(|info| info.user_id)
            .ok_or_else(|| {
                AppError::LocalState(
                    "writing a draft requires the user profile; fetch user info first".to_string(),
                )
            })?;

        let response: IdResponse = self
            .client
            .call_json(&endpoints::CREATE_DRAFT, Params::new(), Payload::json(draft)?)
            .await?;

        Ok(Message::new_draft(
            response.id,
            sender,
            draft,
            Utc::now().timestamp_millis(),
        ))
    }

    pub async fn update_draft_message(&self, message: &Message) -> AppResult<()> {
        ensure_draft(message)?;
        self.client
            .call_empty(
                &endpoints::UPDATE_DRAFT,
                Params::new().with(endpoints::DRAFT_ID, message.id()),
                Payload::json(&message.to_payload())?,
            )
            .await
    }

    /// Sends a new message directly, optionally as a reply.
    pub async fn send_message(&self, draft: &MessageDraft, reply_to: Option<&Message>) -> AppResult<()> {
        match reply_to {
            Some(parent) => self.send_reply(draft, parent.id()).await,
            None => {
                self.client
                    .call_empty(&endpoints::SEND_MESSAGE, Params::new(), Payload::json(draft)?)
                    .await
            }
        }
    }

    pub async fn send_reply(&self, draft: &MessageDraft, parent_id: &str) -> AppResult<()> {
        self.client
            .call_empty(
                &endpoints::SEND_REPLY,
                Params::new().with(endpoints::IN_REPLY_TO, parent_id),
                Payload::json(draft)?,
            )
            .await
    }

    /// Sends a previously created draft. Drafts cannot be sent as replies.
    pub async fn send_draft_message(&self, message: &Message) -> AppResult<()> {
        ensure_draft(message)?;
        self.client
            .call_empty(
                &endpoints::SEND_DRAFT,
                Params::new().with(endpoints::DRAFT_ID, message.id()),
                Payload::json(&message.to_payload())?,
            )
            .await
    }

    pub async fn move_to_trash(&self, messages: &[Message]) -> AppResult<()> {
        self.move_to_trash_by_id(messages.iter().map(Message::id))
            .await
    }

    pub async fn move_to_trash_by_id(
        &self,
        ids: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> AppResult<()> {
        let body = MessageIdsRequest {
            id: collect_ids(ids)?,
        };
        self.client
            .call_empty(&endpoints::MOVE_TO_TRASH, Params::new(), Payload::json(&body)?)
            .await
    }

    pub async fn restore_from_trash(&self, messages: &[Message]) -> AppResult<()> {
        self.restore_from_trash_by_id(messages.iter().map(Message::id))
            .await
    }

    pub async fn restore_from_trash_by_id(
        &self,
        ids: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> AppResult<()> {
        let body = MessageIdsRequest {
            id: collect_ids(ids)?,
        };
        self.client
            .call_empty(&endpoints::RESTORE_FROM_TRASH, Params::new(), Payload::json(&body)?)
            .await
    }

    pub async fn empty_trash(&self) -> AppResult<()> {
        self.client
            .call_empty(&endpoints::EMPTY_TRASH, Params::new(), Payload::Empty)
            .await
    }

    /// Uploads a file to `message` and returns the new attachment id.
    pub async fn upload_attachment(
        &self,
        message: &Message,
        file_name: &str,
        data: Vec<u8>,
    ) -> AppResult<String> {
        self.upload_attachment_to(message.id(), file_name, data)
            .await
    }

    pub async fn upload_attachment_to(
        &self,
        message_id: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> AppResult<String> {
        let file = FilePart {
            field: UPLOAD_FIELD,
            file_name: file_name.to_string(),
            mime_type: mime_guess::from_path(file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            data,
        };

        let response: IdResponse = self
            .client
            .call_json(
                &endpoints::UPLOAD_ATTACHMENT,
                Params::new().with(endpoints::MESSAGE_ID, message_id),
                Payload::Upload(file),
            )
            .await?;
        Ok(response.id)
    }
}

fn ensure_draft(message: &Message) -> AppResult<()> {
    if message.is_draft() {
        return Ok(());
    }

    Err(AppError::LocalState(format!(
        "cannot send message {} with state {}",
        message.id(),
        message.state().as_str()
    )))
}

fn collect_ids(ids: impl IntoIterator<Item = impl AsRef<str>>) -> AppResult<Vec<String>> {
    let ids = ids
        .into_iter()
        .map(|id| id.as_ref().trim().to_string())
        .filter(|id| !id.is_empty())
        .collect::<Vec<_>>();

    if ids.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one message id is required".to_string(),
        ));
    }

    Ok(ids)
}
