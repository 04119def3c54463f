use serde::Serialize;

use crate::cli::{IdsArgs, MarkArgs};
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
struct BulkResult<'a> {
    action: &'a str,
    ids: &'a [String],
}

pub async fn mark(ctx: &AppContext, args: MarkArgs) -> AppResult<()> {
    let client = ctx.connect().await?;
    let read = args.read && !args.unread;
    client
        .conversations()
        .set_read_status_by_id(&args.ids, read)
        .await?;

    let action = if read { "marked read" } else { "marked unread" };
    emit(ctx, action, &args.ids)
}

pub async fn trash(ctx: &AppContext, args: IdsArgs) -> AppResult<()> {
    let client = ctx.connect().await?;
    client.conversations().move_to_trash_by_id(&args.ids).await?;
    emit(ctx, "moved to trash", &args.ids)
}

pub async fn restore(ctx: &AppContext, args: IdsArgs) -> AppResult<()> {
    let client = ctx.connect().await?;
    client
        .conversations()
        .restore_from_trash_by_id(&args.ids)
        .await?;
    emit(ctx, "restored", &args.ids)
}

pub async fn empty(ctx: &AppContext) -> AppResult<()> {
    let client = ctx.connect().await?;
    client.conversations().empty_trash().await?;
    emit(ctx, "emptied trash", &[])
}

fn emit(ctx: &AppContext, action: &str, ids: &[String]) -> AppResult<()> {
    let text = if ids.is_empty() {
        action.to_string()
    } else {
        format!("{action}: {}", ids.join(", "))
    };
    ctx.output.emit(&text, &BulkResult { action, ids })
}
