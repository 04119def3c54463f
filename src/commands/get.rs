use std::fs;

use serde::Serialize;

use crate::cli::{AttachmentArgs, GetArgs};
use crate::commands::list::format_date;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mail::body;
use crate::output::OutputMode;

#[derive(Debug, Serialize)]
struct SavedAttachment {
    message_id: String,
    attachment_id: String,
    path: String,
    bytes: usize,
}

pub async fn run(ctx: &AppContext, args: GetArgs) -> AppResult<()> {
    let client = ctx.connect().await?;
    let message = client.conversations().message(&args.id).await?;

    if ctx.output.mode() == OutputMode::Json {
        return ctx.output.emit("", &message);
    }

    let from = message.from_name().unwrap_or(message.sender());
    println!("id: {}", message.id());
    println!("from: {from}");
    println!("to: {}", message.to_name());
    if let Some(cc) = message.cc_names().filter(|names| !names.is_empty()) {
        println!("cc: {}", cc.join(", "));
    }
    println!("subject: {}", message.subject().unwrap_or("(no subject)"));
    println!("date: {}", format_date(&message));
    println!("state: {}", message.state().as_str());

    for attachment in message.attachments() {
        println!(
            "attachment: {} {} ({} bytes)",
            attachment.id, attachment.filename, attachment.size
        );
    }

    if let Some(content) = message.body() {
        println!();
        println!("{}", body::html_to_text(content));
    }

    Ok(())
}

pub async fn attachment(ctx: &AppContext, args: AttachmentArgs) -> AppResult<()> {
    let client = ctx.connect().await?;
    let data = client
        .conversations()
        .attachment_bytes(&args.message_id, &args.attachment_id)
        .await?;
    fs::write(&args.out, &data)?;

    let saved = SavedAttachment {
        message_id: args.message_id,
        attachment_id: args.attachment_id,
        path: args.out.display().to_string(),
        bytes: data.len(),
    };
    let text = format!("saved {} bytes to {}", saved.bytes, saved.path);
    ctx.output.emit(&text, &saved)
}
