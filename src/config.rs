//! Harness configuration from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//! CLI flags override whatever is read here.

use crate::platform::PlatformFamily;
use std::path::PathBuf;

pub const PLATFORM_VAR: &str = "CAPTURE_LEAKS_PLATFORM";
pub const LSOF_VAR: &str = "CAPTURE_LEAKS_LSOF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub platform: PlatformFamily,
    /// Explicit `lsof` binary; looked up on `PATH` when unset.
    pub lsof_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            platform: PlatformFamily::detect(),
            lsof_path: None,
        }
    }
}

impl HarnessConfig {
    /// Loads `.env`, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("[CONFIG] Loaded {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(PLATFORM_VAR).filter(|v| !v.trim().is_empty()) {
            config.platform = raw.parse().map_err(|e: crate::platform::UnknownPlatform| {
                ConfigError::InvalidValue {
                    key: PLATFORM_VAR,
                    reason: e.to_string(),
                }
            })?;
            log::info!("[CONFIG] Platform forced to {}", config.platform);
        }

        if let Some(raw) = lookup(LSOF_VAR).filter(|v| !v.trim().is_empty()) {
            config.lsof_path = Some(PathBuf::from(raw.trim()));
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_detected_platform() {
        let config = HarnessConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.platform, PlatformFamily::detect());
        assert!(config.lsof_path.is_none());
    }

    #[test]
    fn platform_override_is_parsed() {
        let config =
            HarnessConfig::from_lookup(lookup_from(&[(PLATFORM_VAR, "exempt")])).unwrap();
        assert_eq!(config.platform, PlatformFamily::Exempt);
    }

    #[test]
    fn blank_platform_override_is_ignored() {
        let config = HarnessConfig::from_lookup(lookup_from(&[(PLATFORM_VAR, "  ")])).unwrap();
        assert_eq!(config.platform, PlatformFamily::detect());
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let result = HarnessConfig::from_lookup(lookup_from(&[(PLATFORM_VAR, "plan9")]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains(PLATFORM_VAR));
        assert!(err.to_string().contains("plan9"));
    }

    #[test]
    fn lsof_path_is_read() {
        let config =
            HarnessConfig::from_lookup(lookup_from(&[(LSOF_VAR, "/usr/sbin/lsof")])).unwrap();
        assert_eq!(config.lsof_path, Some(PathBuf::from("/usr/sbin/lsof")));
    }
}
