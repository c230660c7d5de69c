pub mod build;
pub mod check;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use modsite_core::Module;

use crate::config::ModsiteConfig;

/// Arguments shared by every command that reads the site file.
pub fn add_site_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Site file listing the domain and its modules")
                .default_value("./modsite.toml"),
        )
        .arg(
            Arg::new("domain")
                .short('d')
                .long("domain")
                .value_name("DOMAIN")
                .help("Override the domain every import path must live under"),
        )
}

/// Loads the layered configuration and expands its modules.
pub fn load(args: &ArgMatches) -> Result<(ModsiteConfig, Vec<Module>)> {
    let config = ModsiteConfig::load(args)?;
    let modules = config
        .site
        .modules()
        .with_context(|| format!("invalid module list in {}", config.build.config))?;
    Ok((config, modules))
}
