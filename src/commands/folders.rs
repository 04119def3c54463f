use serde_json::json;

use crate::cli::RecipientsArgs;
use crate::context::AppContext;
use crate::conversation::ConversationFolder;
use crate::error::AppResult;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let client = ctx.connect().await?;
    let folders = client.conversations().folders().await?;

    let mut lines = folder_tree(&folders);
    if lines.is_empty() {
        lines.push("0 folders".to_string());
    }
    ctx.output.emit_lines(lines, &folders)
}

pub async fn recipients(ctx: &AppContext, args: RecipientsArgs) -> AppResult<()> {
    let client = ctx.connect().await?;
    let visible = client
        .conversations()
        .visible_recipients(args.search.trim())
        .await?;

    let groups = visible
        .groups
        .iter()
        .map(|group| format!("group {} {}", group.id, group.name));
    let users = visible.users.iter().map(|user| {
        let profile = user.profile.as_deref().unwrap_or("-");
        format!("user  {} {} ({profile})", user.id, user.display_name)
    });
    ctx.output.emit_lines(groups.chain(users), &visible)
}

pub async fn max_depth(ctx: &AppContext) -> AppResult<()> {
    let client = ctx.connect().await?;
    let depth = client.conversations().max_depth().await?;
    ctx.output
        .emit(&depth.to_string(), &json!({ "max_depth": depth }))
}

/// Renders folders depth-first under their parents, indented by depth.
fn folder_tree(folders: &[ConversationFolder]) -> Vec<String> {
    fn walk(
        folders: &[ConversationFolder],
        parent: Option<&str>,
        level: usize,
        lines: &mut Vec<String>,
    ) {
        for folder in folders
            .iter()
            .filter(|folder| folder.parent_id.as_deref() == parent)
        {
            let unread = if folder.unread_count > 0 {
                format!(" ({})", folder.unread_count)
            } else {
                String::new()
            };
            lines.push(format!(
                "{}{} {}{unread}",
                "  ".repeat(level),
                folder.id,
                folder.name
            ));
            walk(folders, Some(folder.id.as_str()), level + 1, lines);
        }
    }

    let mut lines = Vec::new();
    walk(folders, None, 0, &mut lines);

    // Folders whose parent is not in the listing still get shown.
    let known = |id: &str| folders.iter().any(|folder| folder.id == id);
    for orphan in folders
        .iter()
        .filter(|folder| folder.parent_id.as_deref().is_some_and(|id| !known(id)))
    {
        lines.push(format!("{} {}", orphan.id, orphan.name));
        walk(folders, Some(orphan.id.as_str()), 1, &mut lines);
    }

    lines
}
