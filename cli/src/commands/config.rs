//! Config commands

use lead_intake::normalize_prefix;

use crate::config::{mask, Config};
use crate::ConfigCommands;

const NOT_SET: &str = "(not set)";

pub async fn handle(action: ConfigCommands, profile: Option<&str>) -> Result<(), String> {
    match action {
        ConfigCommands::Init => {
            let config = Config::default();
            let path = config.save(profile)?;
            println!("Configuration initialized at {}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(profile).unwrap_or_default();
            match key.as_str() {
                "api_url" => config.api_url = Some(value),
                "token" => config.token = Some(value),
                "lead_prefix" => {
                    let prefix = normalize_prefix(&value)
                        .ok_or_else(|| format!("lead_prefix must be letters and '-', got {}", value))?;
                    config.lead_prefix = Some(prefix);
                }
                "timeout_secs" => {
                    let secs = value
                        .parse::<u64>()
                        .map_err(|_| format!("timeout_secs must be a whole number, got {}", value))?;
                    config.timeout_secs = Some(secs);
                }
                _ => return Err(format!("Unknown config key: {}", key)),
            }
            config.save(profile)?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(profile).unwrap_or_default();
            let value = match key.as_str() {
                "api_url" => config.api_url,
                "token" => config.token.as_deref().map(mask),
                "lead_prefix" => config.lead_prefix,
                "timeout_secs" => config.timeout_secs.map(|s| s.to_string()),
                _ => return Err(format!("Unknown config key: {}", key)),
            };
            println!("{}: {}", key, value.unwrap_or_else(|| NOT_SET.into()));
        }
        ConfigCommands::List => {
            let config = Config::load(profile).unwrap_or_default();
            println!("api_url: {}", config.api_url.unwrap_or_else(|| NOT_SET.into()));
            println!("token: {}", config.token.as_deref().map(mask).unwrap_or_else(|| NOT_SET.into()));
            println!("lead_prefix: {}", config.lead_prefix.unwrap_or_else(|| NOT_SET.into()));
            println!(
                "timeout_secs: {}",
                config.timeout_secs.map(|s| s.to_string()).unwrap_or_else(|| NOT_SET.into())
            );
        }
    }
    Ok(())
}
