use clap::Parser;

mod cli;
pub mod exit_codes;

use cli::args::{Cli, Command};
use cli::commands::dispatch;

fn main() {
    let cli = Cli::parse();

    // The review screen owns the terminal; keep stderr quiet under it.
    let default_filter = match cli.cmd {
        #[cfg(feature = "tui")]
        Command::Review(_) => "warn",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            exit_codes::for_error(&e)
        }
    };
    std::process::exit(code);
}
