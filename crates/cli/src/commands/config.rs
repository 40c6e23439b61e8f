//! `hookgen config`

use anyhow::{Result, bail};
use hookgen_core::Config;
use std::path::Path;

/// Show effective configuration
pub fn cmd_config_show(root: &Path, config: &Config) -> Result<()> {
  let project_config = Config::project_config_path(root);
  let user_config = Config::user_config_path();

  println!("Effective configuration for: {}", root.display());
  println!();

  if project_config.exists() {
    println!("Using project config: {}", project_config.display());
  } else if let Some(user_path) = user_config.filter(|p| p.exists()) {
    println!("Using user config: {}", user_path.display());
  } else {
    println!("Using default configuration (no config file found)");
  }
  println!();

  println!("{}", config.to_toml()?);

  Ok(())
}

/// Write a commented project configuration template
pub fn cmd_config_init(root: &Path, force: bool) -> Result<()> {
  let config_path = Config::project_config_path(root);

  if config_path.exists() && !force {
    bail!(
      "Config file already exists: {} (use --force to overwrite)",
      config_path.display()
    );
  }

  std::fs::write(&config_path, Config::generate_template())?;

  println!("Created project config: {}", config_path.display());
  println!("Edit the file to customize settings.");

  Ok(())
}
