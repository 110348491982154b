use crate::error::{ConfigError, WalletError};
use anyhow::Result;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One `address,privateKey` line from the wallet list. Key material is
/// zeroized on drop and redacted from `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletRecord {
    pub address: String,
    pub private_key: String,
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("address", &self.address)
            .field("private_key", &"***REDACTED***")
            .finish()
    }
}

pub struct WalletManager {
    records: Vec<WalletRecord>,
}

impl WalletManager {
    /// Loads the wallet list. A missing or empty file is a startup error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            msg: e.to_string(),
        })?;

        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((address, key)) = line.split_once(',') else {
                warn!("Skipping invalid wallet line (expected address,privateKey)");
                continue;
            };

            records.push(WalletRecord {
                address: address.trim().to_string(),
                private_key: key.trim().to_string(),
            });
        }

        if records.is_empty() {
            return Err(WalletError::Empty {
                path: path.display().to_string(),
            }
            .into());
        }

        info!("Loaded {} wallets from {}", records.len(), path.display());
        Ok(Self { records })
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[WalletRecord] {
        &self.records
    }
}
