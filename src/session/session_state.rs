use std::path::{Path, PathBuf};

use bincode::{Decode, Encode};
use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

/// State kept between runs: the root that was open last.
#[derive(Debug, Clone, PartialEq, Eq, Default, Decode, Encode)]
pub struct SessionState {
    /// Raw bytes of the root path, so non-UTF-8 roots come back unchanged.
    last_root: Option<Vec<u8>>,
}

impl SessionState {
    /// Reads the state file; a missing or unreadable file starts fresh.
    pub async fn read(path: &Path) -> Self {
        debug!("Reading session state from {}", path.display());
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(_) => {
                info!("No saved session state found, starting fresh");
                return Self::default();
            }
        };

        match bincode::decode_from_slice::<Self, _>(&bytes, bincode::config::standard()) {
            Ok((state, _)) => state,
            Err(e) => {
                info!("Discarding unreadable session state: {}", e);
                Self::default()
            }
        }
    }

    pub async fn write(&self, path: &Path) -> Result<(), SessionStateError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .context(DirectorySnafu { path: parent })?;
        }

        let bytes =
            bincode::encode_to_vec(self, bincode::config::standard()).context(EncodeSnafu)?;
        fs::write(path, bytes).await.0.context(WriteSnafu { path })?;
        debug!("Saved session state to {}", path.display());
        Ok(())
    }

    pub fn last_root(&self) -> Option<PathBuf> {
        self.last_root.as_deref().map(path_from_bytes)
    }

    pub fn remember_root(&mut self, root: &Path) {
        self.last_root = Some(path_to_bytes(root));
    }
}

#[cfg(unix)]
fn path_to_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

// Elsewhere only UTF-8 roots survive a restart unchanged.
#[cfg(not(unix))]
fn path_to_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[derive(Debug, Snafu)]
pub enum SessionStateError {
    #[snafu(display("Failed to create state directory {}", path.display()))]
    DirectoryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to encode session state"))]
    EncodeError { source: bincode::error::EncodeError },
    #[snafu(display("Failed to write session state to {}", path.display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}
