//! CLI Configuration

use lead_intake::config::{API_BASE_ENV, LEAD_PREFIX_ENV, TIMEOUT_ENV};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub lead_prefix: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self, String> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| e.to_string())?;
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf, String> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, content).map_err(|e| e.to_string())?;
        Ok(path)
    }

    /// File value standing in for an unset environment variable
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            API_BASE_ENV => self.api_url.clone(),
            LEAD_PREFIX_ENV => self.lead_prefix.clone(),
            TIMEOUT_ENV => self.timeout_secs.map(|s| s.to_string()),
            _ => None,
        }
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf, String> {
        let home = dirs::home_dir().ok_or("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".lead-intake").join(filename))
    }
}

/// First eight characters, then a mask
pub fn mask(secret: &str) -> String {
    format!("{}****", secret.chars().take(8).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_maps_env_keys() {
        let config = Config {
            api_url: Some("https://crm.example.com".into()),
            token: Some("secret".into()),
            lead_prefix: Some("ACME".into()),
            timeout_secs: Some(10),
        };
        assert_eq!(config.lookup(API_BASE_ENV).as_deref(), Some("https://crm.example.com"));
        assert_eq!(config.lookup(LEAD_PREFIX_ENV).as_deref(), Some("ACME"));
        assert_eq!(config.lookup(TIMEOUT_ENV).as_deref(), Some("10"));
        assert_eq!(config.lookup("LEAD_INTAKE_TOKEN"), None);
    }

    #[test]
    fn test_toml_round_trip_skips_unset() {
        let config: Config = toml::from_str("api_url = \"http://localhost:8080\"\n").unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:8080"));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefghijkl"), "abcdefgh****");
        assert_eq!(mask("ab"), "ab****");
    }
}
