//! Profile configuration persistence and client construction.

use std::path::{Path, PathBuf};
use std::{fmt, fs};

use wework_finance::{Client, DEFAULT_TIMEOUT_SECS, Error};

/// Base configuration directory for all profiles.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wework-finance")
}

/// Config file of a named profile.
pub fn profile_path(name: &str) -> PathBuf {
    config_dir().join(format!("{name}.conf"))
}

/// Persistent per-profile configuration stored as `<profile>.conf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub corp_id: String,
    pub secret: String,
    pub lib_path: Option<PathBuf>,
    pub lib_dir: Option<PathBuf>,
    pub timeout: u32,
    pub proxy: String,
    pub proxy_password: String,
    pub log: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            corp_id: String::new(),
            secret: String::new(),
            lib_path: None,
            lib_dir: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            proxy: String::new(),
            proxy_password: String::new(),
            log: "warn".into(),
        }
    }
}

impl ProfileConfig {
    /// Keys accepted in the file and by `config set`.
    pub const KEYS: [&'static str; 8] = [
        "corp_id",
        "secret",
        "lib_path",
        "lib_dir",
        "timeout",
        "proxy",
        "proxy_password",
        "log",
    ];

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> wework_finance::Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Parse `key = value` lines. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> wework_finance::Result<Self> {
        let mut cfg = Self::default();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (k, v) = line.split_once('=').ok_or_else(|| {
                Error::InvalidArgument(format!("line {}: expected key = value", n + 1))
            })?;
            cfg.set(k.trim(), v.trim())?;
        }
        Ok(cfg)
    }

    /// Set one key from its textual value.
    pub fn set(&mut self, key: &str, value: &str) -> wework_finance::Result<()> {
        let path = || (!value.is_empty()).then(|| PathBuf::from(value));
        match key {
            "corp_id" => value.clone_into(&mut self.corp_id),
            "secret" => value.clone_into(&mut self.secret),
            "lib_path" => self.lib_path = path(),
            "lib_dir" => self.lib_dir = path(),
            "timeout" => {
                self.timeout = value
                    .parse()
                    .map_err(|e| Error::InvalidArgument(format!("timeout: {e}")))?;
            }
            "proxy" => value.clone_into(&mut self.proxy),
            "proxy_password" => value.clone_into(&mut self.proxy_password),
            "log" => value.clone_into(&mut self.log),
            other => {
                return Err(Error::InvalidArgument(format!(
                    "unknown config key: {other} (expected one of: {})",
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Write to `path`, creating the parent directory.
    pub fn save(&self, path: &Path) -> wework_finance::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_string())?;
        Ok(())
    }

    /// Same settings with secrets masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |s: &str| if s.is_empty() { String::new() } else { "***".into() };
        Self {
            secret: mask(&self.secret),
            proxy_password: mask(&self.proxy_password),
            ..self.clone()
        }
    }

    /// Build a client from these settings.
    pub fn connect(&self) -> wework_finance::Result<Client> {
        if self.corp_id.is_empty() {
            return Err(Error::MissingCredentials("corp_id"));
        }
        if self.secret.is_empty() {
            return Err(Error::MissingCredentials("secret"));
        }
        let mut builder = Client::builder()
            .corp_id(&self.corp_id)
            .secret(&self.secret)
            .default_timeout(self.timeout);
        if let Some(p) = &self.lib_path {
            builder = builder.library_path(p);
        }
        if let Some(d) = &self.lib_dir {
            builder = builder.lib_dir(d);
        }
        builder.build()
    }
}

impl fmt::Display for ProfileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        writeln!(f, "corp_id = {}", self.corp_id)?;
        writeln!(f, "secret = {}", self.secret)?;
        writeln!(f, "lib_path = {}", path(&self.lib_path).unwrap_or_default())?;
        writeln!(f, "lib_dir = {}", path(&self.lib_dir).unwrap_or_default())?;
        writeln!(f, "timeout = {}", self.timeout)?;
        writeln!(f, "proxy = {}", self.proxy)?;
        writeln!(f, "proxy_password = {}", self.proxy_password)?;
        writeln!(f, "log = {}", self.log)
    }
}
