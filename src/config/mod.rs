use anyhow::{Context, Result, bail};
use std::env;
use std::fs;
use std::path::PathBuf;
mod types;

pub use types::*;

pub fn load_user_config() -> Result<Config> {
    let config_dir = get_config_directory()?;
    let config_file_path = config_dir.join("config.toml");

    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;

    if !config_file_path.exists() {
        create_default_config(&config_file_path)?;
    }

    let config_content = fs::read_to_string(&config_file_path)
        .with_context(|| format!("Failed to read config file: {:?}", config_file_path))?;

    let config: Result<Config, toml::de::Error> = toml::from_str(&config_content);
    let mut config = match config {
        Ok(cfg) => cfg,
        Err(e) => {
            // Parse failure: back up the old file and rebuild from defaults.
            let bak_path = config_file_path.with_extension("bak");
            fs::rename(&config_file_path, &bak_path)
                .with_context(|| format!("Failed to backup old config to {:?}", bak_path))?;
            create_default_config(&config_file_path)?;
            let config_content = fs::read_to_string(&config_file_path).with_context(|| {
                format!("Failed to read new config file: {:?}", config_file_path)
            })?;
            let config: Config = toml::from_str(&config_content)
                .with_context(|| "Failed to parse new config file")?;
            println!(
                "Config parse error: {}. Old config has been backed up to {:?}, new config created.",
                e, bak_path
            );
            config
        }
    };

    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Secrets can be supplied through the environment instead of the config
/// file, which is what hosting platforms expect.
fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(token) = env::var("BOT_TOKEN") {
        config.telegram.token = token;
    }
    if let Ok(admin_id) = env::var("ADMIN_ID") {
        config.telegram.admin_id = admin_id
            .parse()
            .with_context(|| format!("ADMIN_ID is not a valid user id: {:?}", admin_id))?;
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    if config.telegram.token.is_empty() || config.telegram.token == PLACEHOLDER_TOKEN {
        bail!(
            "No bot token configured. Set BOT_TOKEN or edit [telegram].token in the config file."
        );
    }
    if config.telegram.admin_id == 0 {
        bail!("No admin id configured. Set ADMIN_ID or edit [telegram].admin_id in the config file.");
    }
    Ok(())
}

fn get_config_directory() -> Result<PathBuf> {
    if let Some(config_dir) = dirs::config_dir() {
        Ok(config_dir.join("orderbot"))
    } else {
        anyhow::bail!("Could not determine config directory")
    }
}

fn create_default_config(config_path: &PathBuf) -> Result<()> {
    let default_cfg = Config::default();
    let default_content = toml::to_string_pretty(&default_cfg)
        .map_err(|e| anyhow::anyhow!("Failed to serialize default config: {}", e))?;
    fs::write(config_path, default_content)
        .with_context(|| format!("Failed to write default config to {:?}", config_path))?;
    println!("Created default config file at: {:?}", config_path);
    Ok(())
}
