//! Media download command.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use wework_finance::MediaOptions;

use super::config::ProfileConfig;

/// Download every chunk of `sdkfileid` into `output`.
///
/// A failed download removes the partial file.
pub fn download(
    cfg: &ProfileConfig,
    sdkfileid: &str,
    output: &Path,
) -> wework_finance::Result<()> {
    let client = cfg.connect()?;
    let opts = MediaOptions {
        proxy: cfg.proxy.clone(),
        password: cfg.proxy_password.clone(),
        timeout: cfg.timeout,
    };

    let mut file = BufWriter::new(File::create(output)?);
    match client.download_media(sdkfileid, &mut file, &opts) {
        Ok(n) => {
            eprintln!("wrote {n} bytes to {}", output.display());
            Ok(())
        }
        Err(e) => {
            drop(file);
            let _ = std::fs::remove_file(output);
            Err(e)
        }
    }
}
