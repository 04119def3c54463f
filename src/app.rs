use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose: _,
        debug,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(&profile, json, debug)?;

    let result = match command {
        Command::Auth(args) => commands::auth::run(&ctx, args.command).await,
        Command::Folders => commands::folders::run(&ctx).await,
        Command::List(args) => commands::list::run(&ctx, args).await,
        Command::Get(args) => commands::get::run(&ctx, args).await,
        Command::Attachment(args) => commands::get::attachment(&ctx, args).await,
        Command::Mark(args) => commands::trash::mark(&ctx, args).await,
        Command::Send(args) => commands::send::run(&ctx, args).await,
        Command::Draft(args) => commands::send::draft(&ctx, args).await,
        Command::Trash(args) => commands::trash::trash(&ctx, args).await,
        Command::Restore(args) => commands::trash::restore(&ctx, args).await,
        Command::EmptyTrash => commands::trash::empty(&ctx).await,
        Command::Recipients(args) => commands::folders::recipients(&ctx, args).await,
        Command::MaxDepth => commands::folders::max_depth(&ctx).await,
    };

    // A refresh during the command rotates the tokens; keep them even if the
    // command itself failed afterwards.
    let persisted = ctx.persist().await;
    result.and(persisted)
}
