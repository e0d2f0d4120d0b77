//! wwfinance — command-line access to the WeWork session content archive.

#![allow(
    missing_docs,
    missing_debug_implementations,
    clippy::print_stderr,
    clippy::print_stdout
)]

mod cmd;

use std::process;

use clap::Parser;

use crate::cmd::config::{self, ProfileConfig};
use crate::cmd::{Cli, Command, ConfigCommand};

fn main() {
    if let Err(e) = run() {
        eprintln!("fatal: {e}");
        process::exit(1);
    }
}

fn run() -> wework_finance::Result<()> {
    let cli = Cli::parse();
    let path = config::profile_path(&cli.profile);
    let file_cfg = ProfileConfig::load(&path)?;

    // Config commands work on the file as stored, without flag overrides.
    if let Command::Config(sub) = &cli.command {
        return run_config(sub, file_cfg, &path);
    }

    let mut cfg = file_cfg;
    cli.apply(&mut cfg);
    wework_finance::init_logger(Some(&cfg.log))?;
    tracing::debug!(profile = %cli.profile, path = %path.display(), "profile loaded");

    match &cli.command {
        Command::Chat { seq, limit, all } => cmd::chat::chat(&cfg, *seq, *limit, *all),
        Command::Decrypt {
            encrypt_key,
            encrypt_msg,
        } => cmd::chat::decrypt(&cfg, encrypt_key, encrypt_msg),
        Command::Media { sdkfileid, output } => cmd::media::download(&cfg, sdkfileid, output),
        Command::Config(_) => Ok(()),
    }
}

fn run_config(
    sub: &ConfigCommand,
    mut cfg: ProfileConfig,
    path: &std::path::Path,
) -> wework_finance::Result<()> {
    match sub {
        ConfigCommand::Show => print!("{}", cfg.redacted()),
        ConfigCommand::Set { key, value } => {
            cfg.set(key, value)?;
            cfg.save(path)?;
            eprintln!("{key} updated in {}", path.display());
        }
        ConfigCommand::Path => println!("{}", path.display()),
    }
    Ok(())
}
