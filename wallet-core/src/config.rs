// wallet-core/src/config.rs
//
// Codec configuration, loadable from TOML.

use crate::crypto::wordlist::Language;
use crate::error::{WalletError, WalletResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tunables for the mnemonic codecs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Language used when a caller does not name one.
    #[serde(default = "default_language")]
    pub default_language: Language,
    /// Upper bound of the Electrum V2 `entropy + i` search.
    #[serde(default = "default_electrum_v2_max_attempts")]
    pub electrum_v2_max_attempts: u64,
    /// SLIP-39 PBKDF2 cost: `10000 << e` iterations in total (0..=15).
    #[serde(default = "default_slip39_iteration_exponent")]
    pub slip39_iteration_exponent: u8,
    /// Emit extendable SLIP-39 shares.
    #[serde(default = "default_true")]
    pub slip39_extendable: bool,
}

fn default_language() -> Language {
    Language::English
}

fn default_electrum_v2_max_attempts() -> u64 {
    10_000_000
}

fn default_slip39_iteration_exponent() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            electrum_v2_max_attempts: default_electrum_v2_max_attempts(),
            slip39_iteration_exponent: default_slip39_iteration_exponent(),
            slip39_extendable: default_true(),
        }
    }
}

impl CodecConfig {
    pub fn from_toml_str(content: &str) -> WalletResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> WalletResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Loaded codec config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> WalletResult<String> {
        toml::to_string(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    fn validate(&self) -> WalletResult<()> {
        if self.electrum_v2_max_attempts == 0 {
            return Err(WalletError::Config(
                "electrum_v2_max_attempts must be at least 1".to_string(),
            ));
        }
        if self.slip39_iteration_exponent > 15 {
            return Err(WalletError::Config(format!(
                "slip39_iteration_exponent {} does not fit in 4 bits",
                self.slip39_iteration_exponent
            )));
        }
        Ok(())
    }
}
