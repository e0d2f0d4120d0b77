//! CLI argument definitions and subcommand routing.

pub mod chat;
pub mod config;
pub mod media;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Archive client for WeWork (WeCom) session content.
///
/// Credentials and library location come from the profile file and may be
/// overridden per invocation.
#[derive(Parser)]
#[command(name = "wwfinance", version, about)]
pub struct Cli {
    /// Profile name; settings live in `<config_dir>/wework-finance/<profile>.conf`.
    #[arg(short, long, global = true, default_value = "default")]
    pub profile: String,

    /// Enterprise corp ID (overrides profile).
    #[arg(long, global = true)]
    pub corp_id: Option<String>,

    /// Archive secret (overrides profile).
    #[arg(long, global = true)]
    pub secret: Option<String>,

    /// Exact path of the SDK shared library (overrides profile).
    #[arg(long, global = true)]
    pub lib_path: Option<PathBuf>,

    /// Directory holding the bundled SDK libraries (overrides profile).
    #[arg(long, global = true)]
    pub lib_dir: Option<PathBuf>,

    /// Network timeout in seconds (overrides profile).
    #[arg(short, long, global = true)]
    pub timeout: Option<u32>,

    /// Proxy URL, e.g. socks5://10.0.0.1:8081 (overrides profile).
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Log filter, e.g. `info` or `wework_finance=debug` (overrides profile).
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a page of encrypted chat records and print it as JSON.
    Chat {
        /// Start after this sequence number.
        #[arg(long, default_value_t = 0)]
        seq: u64,
        /// Maximum records per page.
        #[arg(long, default_value_t = wework_finance::DEFAULT_CHAT_LIMIT)]
        limit: u32,
        /// Keep paging until the archive returns an empty page.
        #[arg(long)]
        all: bool,
    },
    /// Decrypt one chat message and print the plaintext JSON.
    Decrypt {
        /// RSA-decrypted `encrypt_random_key` of the record.
        encrypt_key: String,
        /// `encrypt_chat_msg` of the record.
        encrypt_msg: String,
    },
    /// Download a media file by its sdkfileid.
    Media {
        /// `sdkfileid` from a decrypted media message.
        sdkfileid: String,
        /// Output file.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Inspect or edit the profile configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the profile settings (secrets masked).
    Show,
    /// Set one key in the profile file.
    Set {
        /// One of: corp_id, secret, lib_path, lib_dir, timeout, proxy,
        /// proxy_password, log.
        key: String,
        value: String,
    },
    /// Print the profile file path.
    Path,
}

impl Cli {
    /// Apply command-line overrides on top of the profile file.
    pub fn apply(&self, cfg: &mut config::ProfileConfig) {
        if let Some(v) = &self.corp_id {
            cfg.corp_id.clone_from(v);
        }
        if let Some(v) = &self.secret {
            cfg.secret.clone_from(v);
        }
        if let Some(v) = &self.lib_path {
            cfg.lib_path = Some(v.clone());
        }
        if let Some(v) = &self.lib_dir {
            cfg.lib_dir = Some(v.clone());
        }
        if let Some(v) = self.timeout {
            cfg.timeout = v;
        }
        if let Some(v) = &self.proxy {
            cfg.proxy.clone_from(v);
        }
        if let Some(v) = &self.log {
            cfg.log.clone_from(v);
        }
    }
}
