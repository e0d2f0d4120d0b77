//! Chat archive commands: paging and decryption.

use std::io::{self, Write};

use wework_finance::{ChatPageOptions, Client, EncryptedChatRecord};

use super::config::ProfileConfig;

/// Print records from `seq` onwards, one JSON object per line.
///
/// With `all`, keeps requesting pages that start after the last `seq` seen
/// until the archive returns an empty page.
pub fn chat(
    cfg: &ProfileConfig,
    seq: u64,
    limit: u32,
    all: bool,
) -> wework_finance::Result<()> {
    let client = cfg.connect()?;
    let mut out = io::stdout().lock();
    let total = page_through(&client, cfg, seq, limit, all, |rec| {
        let line = serde_json::to_string(rec)?;
        writeln!(out, "{line}")?;
        Ok(())
    })?;
    out.flush()?;
    eprintln!("{total} record(s)");
    Ok(())
}

fn page_through(
    client: &Client,
    cfg: &ProfileConfig,
    seq: u64,
    limit: u32,
    all: bool,
    mut emit: impl FnMut(&EncryptedChatRecord) -> wework_finance::Result<()>,
) -> wework_finance::Result<usize> {
    let mut opts = ChatPageOptions {
        start_seq: seq,
        limit,
        proxy: cfg.proxy.clone(),
        password: cfg.proxy_password.clone(),
        timeout: cfg.timeout,
    };
    let mut total = 0;
    loop {
        let page = client.fetch_chat_page(&opts)?;
        for rec in &page.chatdata {
            emit(rec)?;
        }
        total += page.chatdata.len();
        match page.last_seq() {
            Some(last) if all && last > opts.start_seq => {
                tracing::debug!(last, "next page");
                opts.start_seq = last;
            }
            _ => break,
        }
    }
    Ok(total)
}

/// Decrypt one message and pretty-print the plaintext JSON.
pub fn decrypt(
    cfg: &ProfileConfig,
    encrypt_key: &str,
    encrypt_msg: &str,
) -> wework_finance::Result<()> {
    let client = cfg.connect()?;
    let value = client.decrypt(encrypt_key, encrypt_msg)?;
    let text = serde_json::to_string_pretty(&value)?;
    println!("{text}");
    Ok(())
}
