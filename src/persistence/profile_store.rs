//! TOML-backed profile storage under the user config directory.

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use tracing::{debug, info, warn};

use super::ControllerProfile;
use crate::adapter::report::PORT_COUNT;

const CONFIG_DIR: &str = "gcadapter-input";

fn profile_file(port: usize) -> String {
    format!("port{port}.toml")
}

/// Loads and saves one [`ControllerProfile`] per adapter port.
pub struct ProfileStore {
    base_dir: PathBuf,
}

impl ProfileStore {
    /// Store rooted at the platform config directory.
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| eyre!("no user config directory available"))?;
        Ok(Self::with_base_dir(base.join(CONFIG_DIR)))
    }

    /// Store rooted at an explicit directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn profile_path(&self, port: usize) -> PathBuf {
        self.base_dir.join(profile_file(port))
    }

    /// Write default profiles for any port that has none yet, so a first
    /// run leaves an editable configuration on disk.
    pub async fn ensure_default_profiles(&self) -> Result<()> {
        for port in 0..PORT_COUNT {
            let path = self.profile_path(port);
            let exists = tokio::fs::try_exists(&path)
                .await
                .map_err(|e| eyre!("failed to check for profile {}: {}", path.display(), e))?;
            if !exists {
                info!("Seeding default profile for port {}", port);
                self.save(port, &ControllerProfile::default()).await?;
            }
        }
        Ok(())
    }

    /// Load the profile for `port`.
    ///
    /// Fail-safe: a missing or unparsable file logs a warning and yields
    /// the default profile.
    pub async fn load(&self, port: usize) -> ControllerProfile {
        let path = self.profile_path(port);

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "Could not read profile {}: {}, using defaults",
                    path.display(),
                    e
                );
                return ControllerProfile::default();
            }
        };

        match toml::from_str(&text) {
            Ok(profile) => {
                debug!("Loaded profile for port {} from {}", port, path.display());
                profile
            }
            Err(e) => {
                warn!(
                    "Profile {} is not valid: {}, using defaults",
                    path.display(),
                    e
                );
                ControllerProfile::default()
            }
        }
    }

    /// Persist the profile for `port`, creating the config directory on
    /// first use.
    pub async fn save(&self, port: usize, profile: &ControllerProfile) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| eyre!("failed to create config directory: {}", e))?;

        let content = toml::to_string_pretty(profile)
            .map_err(|e| eyre!("failed to serialize profile: {}", e))?;

        let path = self.profile_path(port);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| eyre!("failed to write profile {}: {}", path.display(), e))?;

        info!("Saved profile for port {} to {}", port, path.display());
        Ok(())
    }
}
