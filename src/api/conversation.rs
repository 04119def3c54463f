use super::resources::{Endpoint, Resource, Verb};

mod paths {
    use super::Resource;

    pub static CONVERSATION: Resource = Resource::root("conversation");
    pub static USER_FOLDERS: Resource = Resource::nested(&CONVERSATION, "userfolders/list");
    pub static FOLDER: Resource = Resource::nested(&CONVERSATION, "list/{folder}");
    pub static MESSAGE: Resource = Resource::nested(&CONVERSATION, "message/{messageId}");
    pub static ATTACHMENT: Resource = Resource::nested(&MESSAGE, "attachment/{attachmentId}");
    pub static ATTACHMENTS: Resource = Resource::nested(&MESSAGE, "attachment");
    pub static TOGGLE_UNREAD: Resource = Resource::nested(&CONVERSATION, "toggleUnread");
    pub static VISIBLE: Resource = Resource::nested(&CONVERSATION, "visible");
    pub static MAX_DEPTH: Resource = Resource::nested(&CONVERSATION, "max-depth");
    pub static DRAFT: Resource = Resource::nested(&CONVERSATION, "draft");
    pub static DRAFT_ID: Resource = Resource::nested(&DRAFT, "{id}");
    pub static SEND: Resource = Resource::nested(&CONVERSATION, "send");
    pub static TRASH: Resource = Resource::nested(&CONVERSATION, "trash");
    pub static RESTORE: Resource = Resource::nested(&CONVERSATION, "restore");
    pub static EMPTY_TRASH: Resource = Resource::nested(&CONVERSATION, "emptyTrash");
}

pub const FOLDER: &str = "folder";
pub const MESSAGE_ID: &str = "messageId";
pub const ATTACHMENT_ID: &str = "attachmentId";
pub const DRAFT_ID: &str = "id";
pub const PAGE: &str = "page";
pub const SEARCH: &str = "search";
pub const IN_REPLY_TO: &str = "In-Reply-To";

pub static LIST_FOLDERS: Endpoint = Endpoint::new(Verb::Get, &paths::USER_FOLDERS);
pub static FOLDER_MESSAGES: Endpoint =
    Endpoint::new(Verb::Get, &paths::FOLDER).with_query(&[PAGE]);
pub static GET_MESSAGE: Endpoint = Endpoint::new(Verb::Get, &paths::MESSAGE);
pub static GET_ATTACHMENT: Endpoint = Endpoint::new(Verb::Get, &paths::ATTACHMENT);
pub static UPLOAD_ATTACHMENT: Endpoint = Endpoint::new(Verb::Post, &paths::ATTACHMENTS);
pub static TOGGLE_UNREAD: Endpoint = Endpoint::new(Verb::Post, &paths::TOGGLE_UNREAD);
pub static VISIBLE_RECIPIENTS: Endpoint =
    Endpoint::new(Verb::Get, &paths::VISIBLE).with_query(&[SEARCH]);
pub static MAX_DEPTH: Endpoint = Endpoint::new(Verb::Get, &paths::MAX_DEPTH);
pub static CREATE_DRAFT: Endpoint = Endpoint::new(Verb::Post, &paths::DRAFT);
pub static UPDATE_DRAFT: Endpoint = Endpoint::new(Verb::Put, &paths::DRAFT_ID);
pub static SEND_MESSAGE: Endpoint = Endpoint::new(Verb::Post, &paths::SEND);
/// Same path as [`SEND_MESSAGE`]; the parent message travels as a query parameter.
pub static SEND_REPLY: Endpoint =
    Endpoint::new(Verb::Post, &paths::SEND).with_query(&[IN_REPLY_TO]);
pub static SEND_DRAFT: Endpoint = Endpoint::new(Verb::Post, &paths::SEND).with_query(&[DRAFT_ID]);
pub static MOVE_TO_TRASH: Endpoint = Endpoint::new(Verb::Put, &paths::TRASH);
pub static RESTORE_FROM_TRASH: Endpoint = Endpoint::new(Verb::Put, &paths::RESTORE);
pub static EMPTY_TRASH: Endpoint = Endpoint::new(Verb::Delete, &paths::EMPTY_TRASH);
