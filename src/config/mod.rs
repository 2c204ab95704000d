//! Configuration module for GeoSearch-RS
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use once_cell::sync::OnceCell;

/// Global settings instance
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Initialize global settings with an already-loaded value
pub fn init(settings: Settings) -> Result<()> {
    SETTINGS
        .set(settings)
        .map_err(|_| anyhow::anyhow!("Settings already initialized"))?;
    Ok(())
}

/// Get a reference to the global settings, if initialized
pub fn get() -> Option<&'static Settings> {
    SETTINGS.get()
}

/// Check if settings have been initialized
pub fn is_initialized() -> bool {
    SETTINGS.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_settings_set_once() {
        let mut settings = Settings::default();
        settings.general.instance_name = "test-instance".to_string();

        init(settings).unwrap();
        assert!(is_initialized());
        assert_eq!(get().map(|s| s.general.instance_name.as_str()), Some("test-instance"));
        assert!(init(Settings::default()).is_err());
    }
}
