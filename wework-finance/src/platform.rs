//! Locating the native SDK library for the running platform.
//!
//! The vendor only publishes Windows x86-64 and Linux x86-64 / arm64 builds.
//! Bundled builds live under a base directory laid out as:
//!
//! ```text
//! <lib_dir>/windows/WeWorkFinanceSdk.dll
//! <lib_dir>/linux/libWeWorkFinanceSdk_C_x86.so
//! <lib_dir>/linux/libWeWorkFinanceSdk_C_arm.so
//! ```

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the bundled library directory.
pub const LIB_DIR_ENV: &str = "WEWORK_FINANCE_LIB_DIR";

/// A bundled SDK build: sub-directory and file name under the library dir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BundledLibrary {
    /// Per-platform sub-directory.
    pub dir: &'static str,
    /// Library file name.
    pub file: &'static str,
}

impl BundledLibrary {
    /// Windows x86-64 build.
    pub const WINDOWS_X86_64: Self = Self {
        dir: "windows",
        file: "WeWorkFinanceSdk.dll",
    };
    /// Linux x86-64 build.
    pub const LINUX_X86_64: Self = Self {
        dir: "linux",
        file: "libWeWorkFinanceSdk_C_x86.so",
    };
    /// Linux arm64 build.
    pub const LINUX_ARM64: Self = Self {
        dir: "linux",
        file: "libWeWorkFinanceSdk_C_arm.so",
    };

    /// Full path of this build under `lib_dir`.
    #[must_use]
    pub fn path_in(self, lib_dir: &Path) -> PathBuf {
        lib_dir.join(self.dir).join(self.file)
    }
}

/// Pick the bundled build for an OS / architecture pair.
///
/// Accepts both Rust's `std::env::consts` spellings (`linux`, `macos`,
/// `x86_64`, `aarch64`) and `uname`-style ones (`Linux`, `Darwin`, `AMD64`,
/// `arm64`), case-insensitively.
pub fn bundled_library(os: &str, arch: &str) -> Result<BundledLibrary> {
    let os = os.to_ascii_lowercase();
    let arch = arch.to_ascii_lowercase();
    let x86_64 = matches!(arch.as_str(), "x86_64" | "amd64");
    let arm64 = matches!(arch.as_str(), "aarch64" | "arm64");
    match os.as_str() {
        "windows" if x86_64 => Ok(BundledLibrary::WINDOWS_X86_64),
        "linux" if x86_64 => Ok(BundledLibrary::LINUX_X86_64),
        "linux" if arm64 => Ok(BundledLibrary::LINUX_ARM64),
        "windows" | "linux" => Err(Error::UnsupportedPlatform(format!(
            "unsupported CPU architecture: {arch}"
        ))),
        "darwin" | "macos" => Err(Error::UnsupportedPlatform(
            "macOS is not supported by the SDK; run under Linux (e.g. in a Docker container)"
                .into(),
        )),
        _ => Err(Error::UnsupportedPlatform(format!(
            "unsupported operating system: {os}"
        ))),
    }
}

/// Default directory searched for bundled builds.
///
/// [`LIB_DIR_ENV`] if set, else `libs/` next to the running executable.
#[must_use]
pub fn default_lib_dir() -> PathBuf {
    if let Some(dir) = env::var_os(LIB_DIR_ENV) {
        return PathBuf::from(dir);
    }
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("libs")
}

/// Resolve the SDK library path.
///
/// An explicit path must exist. Otherwise the bundled build for the running
/// platform is looked up under `lib_dir` (or [`default_lib_dir`]).
pub fn resolve(explicit: Option<&Path>, lib_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::LibraryNotFound(path.to_path_buf()));
        }
        return Ok(path.to_path_buf());
    }
    let bundled = bundled_library(env::consts::OS, env::consts::ARCH)?;
    let path = lib_dir.map_or_else(
        || bundled.path_in(&default_lib_dir()),
        |dir| bundled.path_in(dir),
    );
    if !path.exists() {
        return Err(Error::LibraryNotFound(path));
    }
    Ok(path)
}
