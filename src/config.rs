use figment::{
    providers::{Env, Format, Toml},
    Figment, Profile,
};
use serde::Deserialize;

use crate::{
    error::Result,
    pairing::{Exclusions, PairingRules},
};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "SECRET_SANTA_CONFIG";
/// Environment variable selecting the configuration profile.
pub const PROFILE_VAR: &str = "SECRET_SANTA_PROFILE";
/// Prefix of environment variables overriding individual settings.
pub const ENV_PREFIX: &str = "SECRET_SANTA_";

const DEFAULT_CONFIG_PATH: &str = "SecretSanta.toml";

/// Application configuration, derived from `SecretSanta.toml` and
/// `SECRET_SANTA_*` environment variables.
#[derive(Debug, Deserialize)]
pub struct Config {
    // secrets
    db_uri: String,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
    #[serde(default)]
    rules: PairingRules,
    #[serde(default)]
    exclusions: Exclusions,
}

fn default_db_name() -> String {
    "secret_santa".to_string()
}

impl Config {
    /// The layered configuration sources, highest priority last.
    ///
    /// Nested settings can be overridden with a double underscore, e.g.
    /// `SECRET_SANTA_RULES__MAX_ATTEMPTS=5000`.
    pub fn figment() -> Figment {
        let path = Env::var_or(CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH);
        Figment::from(Toml::file(path).nested())
            .merge(Env::prefixed(ENV_PREFIX).split("__").global())
            .select(Profile::from_env_or(PROFILE_VAR, Profile::Default))
    }

    /// Load the configuration from its usual sources.
    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    /// MongoDB connection string.
    /// Configured via `SECRET_SANTA_DB_URI`.
    pub fn db_uri(&self) -> &str {
        &self.db_uri
    }

    /// Name of the database holding accounts and pairs.
    /// Configured via `SECRET_SANTA_DB_NAME`.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Default rules for a draw; command-line flags may relax them.
    pub fn rules(&self) -> PairingRules {
        self.rules
    }

    /// Who must not give to whom.
    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }
}
