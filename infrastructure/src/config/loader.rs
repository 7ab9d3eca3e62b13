//! Configuration file loader with multi-source merging

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::Path;
use wayfarer_application::VotingConfig;

/// Loads the voting engine configuration
///
/// Priority (highest to lowest):
/// 1. `WAYFARER_*` environment variables (e.g.
///    `WAYFARER_POLICY__AUTO_CONFIRM_HOURS=24`)
/// 2. Explicit config path (if provided)
/// 3. Project-level `wayfarer.toml`
/// 4. Default values
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&Path>) -> Result<VotingConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(VotingConfig::default()));

        let project = Path::new("wayfarer.toml");
        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("WAYFARER_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration
    pub fn load_defaults() -> VotingConfig {
        VotingConfig::default()
    }
}
