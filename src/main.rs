use std::io::{self, IsTerminal};

use clap::Parser;
use env_logger::fmt::WriteStyle;
use log::LevelFilter;

use edifice::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = edifice::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let level = match (cli.debug, cli.verbose) {
        (true, _) | (false, 2..) => LevelFilter::Debug,
        (false, 1) => LevelFilter::Info,
        (false, 0) => LevelFilter::Warn,
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.filter_module("edifice", level);
    if !io::stderr().is_terminal() {
        builder.write_style(WriteStyle::Never);
    }

    if let Err(err) = builder.try_init() {
        eprintln!("logger already initialized: {err}");
    }
}
