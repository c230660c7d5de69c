use anyhow::{Context, Result};
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use modsite_core::SiteConfig;

/// Complete configuration that merges CLI args, env vars, the site file, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModsiteConfig {
    /// Build configuration
    #[serde(default)]
    pub build: BuildConfig,
    /// Domain, page texts and modules (from modsite-core)
    #[serde(flatten)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory for the generated site
    pub output: String,
    /// Site file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "public".to_string(),
            config: "./modsite.toml".to_string(),
        }
    }
}

impl ModsiteConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (MODSITE_*)
    /// 3. Site file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let defaults = Self::default();
        let config_file = args
            .try_get_one::<String>("config")
            .ok()
            .flatten()
            .cloned()
            .unwrap_or_else(|| defaults.build.config.clone());

        let mut builder = ConfigBuilder::builder()
            .add_source(ConfigBuilder::try_from(&defaults)?)
            .add_source(File::new(&config_file, FileFormat::Toml).required(true))
            .add_source(
                Environment::with_prefix("MODSITE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override("build.config", config_file.clone())?;

        // Only override with CLI args that are actually defined for this command
        if let Some(output) = args.try_get_one::<String>("output").ok().flatten() {
            builder = builder.set_override("build.output", output.clone())?;
        }
        if let Some(domain) = args.try_get_one::<String>("domain").ok().flatten() {
            builder = builder.set_override("domain", domain.clone())?;
        }

        let config = builder
            .build()
            .with_context(|| format!("failed to load configuration from {config_file}"))?;
        let modsite_config: ModsiteConfig = config.try_deserialize()?;

        Ok(modsite_config)
    }
}
