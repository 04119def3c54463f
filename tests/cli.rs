use clap::Parser;
use edifice::cli::{AuthCommand, Cli, Command};

#[test]
fn parses_auth_login() {
    let cli = Cli::try_parse_from(["edifice", "auth", "login", "--username", "jean.dupont"])
        .expect("cli parse should work");
    match cli.command {
        Command::Auth(auth) => assert!(matches!(
            auth.command,
            AuthCommand::Login { ref username, password: None } if username == "jean.dupont"
        )),
        _ => panic!("expected auth command"),
    }
}

#[test]
fn parses_auth_token_pair() {
    let cli = Cli::try_parse_from([
        "edifice", "auth", "token", "--access", "a", "--refresh", "r",
    ])
    .expect("cli parse should work");
    match cli.command {
        Command::Auth(auth) => assert!(matches!(
            auth.command,
            AuthCommand::Token { ref access, ref refresh } if access == "a" && refresh == "r"
        )),
        _ => panic!("expected auth command"),
    }
}

#[test]
fn parses_global_flags() {
    let cli = Cli::try_parse_from(["edifice", "folders", "--profile", "college", "--json", "-vv", "--debug"])
        .expect("cli parse should work");
    assert_eq!(cli.profile, "college");
    assert!(cli.json);
    assert!(cli.debug);
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.command, Command::Folders));
}

#[test]
fn parses_get() {
    let cli = Cli::try_parse_from(["edifice", "get", "abc123"]).expect("cli parse should work");
    match cli.command {
        Command::Get(get) => assert_eq!(get.id, "abc123"),
        _ => panic!("expected get command"),
    }
}

#[test]
fn parses_send() {
    let cli = Cli::try_parse_from([
        "edifice",
        "send",
        "--to",
        "u-1,u-2",
        "--cci",
        "u-3",
        "--subject",
        "hi",
        "--body",
        "hello",
        "--attach",
        "a.txt",
        "--attach",
        "b.txt",
    ])
    .expect("cli parse should work");
    match cli.command {
        Command::Send(send) => {
            assert_eq!(send.compose.to, ["u-1", "u-2"]);
            assert_eq!(send.compose.cci, ["u-3"]);
            assert_eq!(send.compose.subject.as_deref(), Some("hi"));
            assert_eq!(send.compose.body.as_deref(), Some("hello"));
            assert_eq!(send.attach.len(), 2);
        }
        _ => panic!("expected send command"),
    }
}

#[test]
fn list_defaults_to_inbox() {
    let cli = Cli::try_parse_from(["edifice", "list"]).expect("cli parse should work");
    match cli.command {
        Command::List(list) => {
            assert_eq!(list.folder, "INBOX");
            assert_eq!(list.page, None);
        }
        _ => panic!("expected list command"),
    }
}

#[test]
fn parses_list_with_page() {
    let cli = Cli::try_parse_from(["edifice", "list", "TRASH", "--page", "3"])
        .expect("cli parse should work");
    match cli.command {
        Command::List(list) => {
            assert_eq!(list.folder, "TRASH");
            assert_eq!(list.page, Some(3));
        }
        _ => panic!("expected list command"),
    }
}

#[test]
fn mark_requires_a_status() {
    assert!(Cli::try_parse_from(["edifice", "mark", "m-1"]).is_err());
    assert!(Cli::try_parse_from(["edifice", "mark", "m-1", "--read", "--unread"]).is_err());

    let cli = Cli::try_parse_from(["edifice", "mark", "m-1", "m-2", "--unread"])
        .expect("cli parse should work");
    match cli.command {
        Command::Mark(mark) => {
            assert_eq!(mark.ids, ["m-1", "m-2"]);
            assert!(mark.unread);
        }
        _ => panic!("expected mark command"),
    }
}

#[test]
fn trash_requires_ids() {
    assert!(Cli::try_parse_from(["edifice", "trash"]).is_err());
    assert!(matches!(
        Cli::try_parse_from(["edifice", "empty-trash"]).map(|cli| cli.command),
        Ok(Command::EmptyTrash)
    ));
}
