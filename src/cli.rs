use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "edifice", version, about = "Edifice school platform messaging client")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[arg(long, global = true, help = "Log every request sent to the instance")]
    pub debug: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Auth(AuthArgs),
    /// List user folders
    Folders,
    List(ListArgs),
    Get(GetArgs),
    Attachment(AttachmentArgs),
    Mark(MarkArgs),
    Send(SendArgs),
    Draft(DraftArgs),
    Trash(IdsArgs),
    Restore(IdsArgs),
    EmptyTrash,
    Recipients(RecipientsArgs),
    /// Maximum folder nesting depth allowed by the instance
    MaxDepth,
}

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in with a username and password
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, help = "Prompted for when omitted")]
        password: Option<String>,
    },
    /// Sign in with a SAML assertion read from a file
    Saml {
        #[arg(long)]
        assertion_file: PathBuf,
    },
    /// Use an existing token pair
    Token {
        #[arg(long)]
        access: String,
        #[arg(long)]
        refresh: String,
    },
    Refresh,
    Status,
    Logout,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(default_value = "INBOX", help = "System folder (INBOX, OUTBOX, DRAFT, TRASH) or folder id")]
    pub folder: String,
    #[arg(long, help = "Page number")]
    pub page: Option<u32>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    #[arg(help = "Message id")]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct AttachmentArgs {
    #[arg(help = "Message id")]
    pub message_id: String,
    #[arg(help = "Attachment id")]
    pub attachment_id: String,
    #[arg(long, help = "Destination file")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("status").required(true).args(["read", "unread"])))]
pub struct MarkArgs {
    #[arg(required = true, num_args = 1.., help = "Message ids")]
    pub ids: Vec<String>,
    #[arg(long)]
    pub read: bool,
    #[arg(long)]
    pub unread: bool,
}

#[derive(Debug, Args)]
pub struct ComposeArgs {
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Recipient user or group ids")]
    pub to: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Carbon copy ids")]
    pub cc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Blind carbon copy ids")]
    pub cci: Vec<String>,
    #[arg(long, visible_alias = "subj", help = "Message subject")]
    pub subject: Option<String>,
    #[arg(long, help = "Inline body text (markdown)")]
    pub body: Option<String>,
    #[arg(long, help = "Read body from file")]
    pub body_file: Option<PathBuf>,
    #[arg(long, help = "Read body from stdin")]
    pub stdin: bool,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub compose: ComposeArgs,
    #[arg(long, help = "Reply to an existing message id")]
    pub reply: Option<String>,
    #[arg(long, action = ArgAction::Append, help = "Attach file (repeatable)")]
    pub attach: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DraftArgs {
    #[command(flatten)]
    pub compose: ComposeArgs,
}

#[derive(Debug, Args)]
pub struct IdsArgs {
    #[arg(required = true, num_args = 1.., help = "Message ids")]
    pub ids: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RecipientsArgs {
    #[arg(default_value = "", help = "Name filter")]
    pub search: String,
}
