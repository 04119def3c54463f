use crate::cli::ListArgs;
use crate::context::AppContext;
use crate::conversation::Message;
use crate::error::{AppError, AppResult};
use crate::mail::body;
use crate::output::OutputMode;

pub async fn run(ctx: &AppContext, args: ListArgs) -> AppResult<()> {
    if args.page == Some(0) {
        return Err(AppError::InvalidInput(
            "--page must be greater than 0".to_string(),
        ));
    }

    let client = ctx.connect().await?;
    let messages = client
        .conversations()
        .folder_messages(&args.folder, args.page)
        .await?;

    if ctx.output.mode() == OutputMode::Text {
        if messages.is_empty() {
            println!("0 messages");
            return Ok(());
        }

        for (index, message) in messages.iter().enumerate() {
            let marker = if message.is_unread() { "*" } else { " " };
            let from = message.from_name().unwrap_or(message.sender());
            let subject = message.subject().unwrap_or("(no subject)");
            let date = format_date(message);

            println!("{}.{marker}{}", index + 1, message.id());
            println!("   from: {from}");
            println!("   to: {}", message.to_name());
            println!("   subject: {subject}");
            println!("   date: {date}");
            if let Some(preview) = message.body() {
                println!();
                println!("   {}", format_preview(Some(preview)));
            }

            if index + 1 < messages.len() {
                println!();
            }
        }

        return Ok(());
    }

    let text = format!("{} messages", messages.len());
    ctx.output.emit(&text, &messages)
}

pub(crate) fn format_date(message: &Message) -> String {
    message
        .date()
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "(no date)".to_string())
}

fn format_preview(snippet: Option<&str>) -> String {
    let snippet = snippet.unwrap_or("(no preview)");
    let decoded = body::html_to_text(snippet);
    let compact = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    if compact.len() <= 120 {
        return compact;
    }

    let mut end = 120;
    while !compact.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &compact[..end])
}
