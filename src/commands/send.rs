use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{ComposeArgs, DraftArgs, SendArgs};
use crate::context::AppContext;
use crate::conversation::{Message, MessageDraft};
use crate::error::{AppError, AppResult};
use crate::mail::body;

#[derive(Debug, Serialize)]
struct SendResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    draft_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_reply_to: Option<String>,
    attachment_ids: Vec<String>,
}

struct FileAttachment {
    filename: String,
    data: Vec<u8>,
}

pub async fn run(ctx: &AppContext, args: SendArgs) -> AppResult<()> {
    let client = ctx.connect().await?;
    let conversations = client.conversations();

    let parent = match args.reply.as_deref() {
        Some(reply_id) => Some(conversations.message(reply_id).await?),
        None => None,
    };
    let draft = build_draft(args.compose, parent.as_ref())?;
    let attachments = read_attachments(&args.attach)?;

    if attachments.is_empty() {
        conversations.send_message(&draft, parent.as_ref()).await?;
        let result = SendResult {
            draft_id: None,
            in_reply_to: args.reply,
            attachment_ids: Vec::new(),
        };
        return ctx.output.emit("message sent", &result);
    }

    // Uploads need a message to hang off, so attachments go through a draft.
    if parent.is_some() {
        return Err(AppError::InvalidInput(
            "--attach cannot be combined with --reply".to_string(),
        ));
    }

    let message = conversations.write_draft_message(&draft).await?;
    let mut attachment_ids = Vec::new();
    for attachment in attachments {
        let id = conversations
            .upload_attachment(&message, &attachment.filename, attachment.data)
            .await?;
        log::debug!("uploaded {} as {id}", attachment.filename);
        attachment_ids.push(id);
    }
    conversations.send_draft_message(&message).await?;

    let text = format!(
        "message sent with {} attachment(s)",
        attachment_ids.len()
    );
    let result = SendResult {
        draft_id: Some(message.id().to_string()),
        in_reply_to: None,
        attachment_ids,
    };
    ctx.output.emit(&text, &result)
}

pub async fn draft(ctx: &AppContext, args: DraftArgs) -> AppResult<()> {
    let client = ctx.connect().await?;
    let draft = build_draft(args.compose, None)?;
    let message = client.conversations().write_draft_message(&draft).await?;

    let text = format!("saved draft {}", message.id());
    ctx.output.emit(&text, &message)
}

fn build_draft(args: ComposeArgs, parent: Option<&Message>) -> AppResult<MessageDraft> {
    let body = body::markdown_to_html(&read_body(&args)?);

    let mut to = args.to;
    if to.is_empty() {
        to.extend(parent.map(|parent| parent.sender().to_string()));
    }
    if to.is_empty() {
        return Err(AppError::InvalidInput(
            "--to is required unless --reply is used".to_string(),
        ));
    }

    let subject = match (args.subject, parent) {
        (Some(subject), Some(_)) => ensure_reply_subject(subject),
        (Some(subject), None) => subject,
        (None, Some(parent)) => ensure_reply_subject(
            parent.subject().unwrap_or("(no subject)").to_string(),
        ),
        (None, None) => {
            return Err(AppError::InvalidInput(
                "--subject is required unless --reply is used".to_string(),
            ));
        }
    };

    Ok(MessageDraft::new(subject, body)
        .to(to)
        .cc(args.cc)
        .cci(args.cci))
}

fn read_body(args: &ComposeArgs) -> AppResult<String> {
    let selected = [args.body.is_some(), args.body_file.is_some(), args.stdin]
        .into_iter()
        .filter(|selected| *selected)
        .count();

    if selected == 0 {
        return Err(AppError::InvalidInput(
            "missing body source; pass one of --body, --body-file, or --stdin".to_string(),
        ));
    }

    if selected > 1 {
        return Err(AppError::InvalidInput(
            "pass only one body source: --body, --body-file, or --stdin".to_string(),
        ));
    }

    if let Some(body) = &args.body {
        return Ok(body.clone());
    }

    if let Some(path) = &args.body_file {
        return Ok(fs::read_to_string(path)?);
    }

    let mut body = String::new();
    io::stdin().read_to_string(&mut body)?;
    Ok(body)
}

fn read_attachments(paths: &[PathBuf]) -> AppResult<Vec<FileAttachment>> {
    let mut attachments = Vec::new();

    for path in paths {
        let data = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("invalid attachment path: {}", path.display()))
            })?;

        attachments.push(FileAttachment { filename, data });
    }

    Ok(attachments)
}

fn ensure_reply_subject(subject: String) -> String {
    let trimmed = subject.trim();
    if trimmed.to_ascii_lowercase().starts_with("re:") {
        trimmed.to_string()
    } else {
        format!("Re: {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose() -> ComposeArgs {
        ComposeArgs {
            to: Vec::new(),
            cc: Vec::new(),
            cci: Vec::new(),
            subject: None,
            body: Some("**salut**".to_string()),
            body_file: None,
            stdin: false,
        }
    }

    fn parent() -> Message {
        serde_json::from_str(
            r#"{"id":"p-1","subject":"Sortie","from":"u-7","state":"SENT","to":["me"],"cc":[],"cci":[],"displayNames":[],"date":0}"#,
        )
        .expect("message parses")
    }

    #[test]
    fn reply_defaults_recipient_and_subject() {
        let draft = build_draft(compose(), Some(&parent())).expect("draft builds");
        assert_eq!(draft.to, ["u-7"]);
        assert_eq!(draft.subject, "Re: Sortie");
        assert_eq!(draft.body, "<p><strong>salut</strong></p>");
    }

    #[test]
    fn new_message_requires_recipient() {
        let mut args = compose();
        args.subject = Some("hi".to_string());
        assert!(matches!(
            build_draft(args, None),
            Err(AppError::InvalidInput(message)) if message.contains("--to")
        ));
    }

    #[test]
    fn new_message_requires_subject() {
        let mut args = compose();
        args.to = vec!["u-1".to_string()];
        assert!(matches!(
            build_draft(args, None),
            Err(AppError::InvalidInput(message)) if message.contains("--subject")
        ));
    }

    #[test]
    fn rejects_multiple_body_sources() {
        let mut args = compose();
        args.stdin = true;
        assert!(read_body(&args).is_err());
    }

    #[test]
    fn keeps_existing_reply_prefix() {
        assert_eq!(ensure_reply_subject(" RE: hello ".to_string()), "RE: hello");
        assert_eq!(ensure_reply_subject("hello".to_string()), "Re: hello");
    }
}
