//! In-memory [`ConfigPort`] backed by a postcard blob.
//!
//! Stands in for flash storage on the host: the profile is validated,
//! encoded with postcard and kept as raw bytes, so a load exercises the
//! same decode path a flash-backed store would.

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::MachineConfig;
use crate::error::ConfigError;

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    blob: Option<Vec<u8>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with pre-existing raw bytes (for corruption tests).
    pub fn with_blob(blob: Vec<u8>) -> Self {
        Self { blob: Some(blob) }
    }

    pub fn blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }
}

impl ConfigPort for MemoryConfigStore {
    fn load(&self) -> Result<MachineConfig, ConfigError> {
        let Some(bytes) = &self.blob else {
            info!("config store: nothing stored, using defaults");
            return Ok(MachineConfig::default());
        };
        let cfg: MachineConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate().map_err(|_| ConfigError::Corrupted)?;
        info!("config store: loaded {} bytes", bytes.len());
        Ok(cfg)
    }

    fn save(&mut self, config: &MachineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        info!("config store: saved {} bytes", bytes.len());
        self.blob = Some(bytes);
        Ok(())
    }
}
