//! Site server configuration, resolved once at startup.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DIST_DIR: &str = "dist/medical-tourism/browser";

#[derive(Clone, Debug)]
pub struct SiteConfig {
    addr: SocketAddr,
    dist_dir: PathBuf,
}

impl SiteConfig {
    /// Create a new `SiteConfig`.
    ///
    /// # Errors
    /// Returns an error if `dist_dir` does not exist or is not a directory; the site cannot be
    /// served without a built front end.
    pub fn new(addr: SocketAddr, dist_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dist_dir = dist_dir.into();
        if !dist_dir.is_dir() {
            anyhow::bail!(
                "Front-end build directory does not exist: {}",
                dist_dir.display()
            );
        }
        Ok(Self { addr, dist_dir })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    pub fn index_html(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}

/// Resolve the bind address from raw `MEDTOUR_SITE_ADDR` and `PORT` values.
///
/// An explicit address wins; otherwise the server binds `0.0.0.0` on `PORT`, or
/// [`DEFAULT_PORT`] when that is unset or blank.
pub fn site_addr_from_env_values(
    site_addr: Option<String>,
    port: Option<String>,
) -> anyhow::Result<SocketAddr> {
    if let Some(addr) = site_addr.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return addr
            .parse()
            .with_context(|| format!("invalid site address {addr:?}"));
    }

    let port = match port.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(port) => port
            .parse::<u16>()
            .with_context(|| format!("invalid PORT {port:?}"))?,
        None => DEFAULT_PORT,
    };
    Ok(SocketAddr::from(([0, 0, 0, 0], port)))
}

/// Resolve the front-end build directory from a raw `MEDTOUR_DIST_DIR` value.
pub fn dist_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR))
}
