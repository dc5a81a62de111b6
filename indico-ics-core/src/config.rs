//! Export configuration.
//!
//! The original deployment keeps a `config.yaml` next to the tool:
//!
//! ```yaml
//! indico_instance: https://indico.example.org
//! api_token: indp_xxxxxxxx
//! start_date: 2024-01-01
//! end_date: 2024-12-31
//! ```
//!
//! TOML works too (picked by file extension). Any key can be overridden from
//! the environment with an `INDICO_ICS_` prefix, e.g. `INDICO_ICS_API_TOKEN`.

use std::fmt;
use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{IndicoError, IndicoResult};

const ENV_PREFIX: &str = "INDICO_ICS";

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone)]
pub struct IndicoConfig {
    /// Base URL of the Indico instance, e.g. `https://indico.example.org`
    pub indico_instance: String,

    /// Bearer token sent with every request
    pub api_token: String,

    /// First day of the booking window (`YYYY-MM-DD`), passed through verbatim
    pub start_date: String,

    /// Last day of the booking window (`YYYY-MM-DD`), passed through verbatim
    pub end_date: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Restrict the room listing to public rooms
    #[serde(default)]
    pub only_public: bool,
}

impl IndicoConfig {
    pub fn load(path: &Path) -> IndicoResult<Self> {
        if !path.exists() {
            return Err(IndicoError::Config(format!(
                "Config file not found at {}\n\n\
                Create it with:\n\n\
                indico_instance: https://indico.example.org\n\
                api_token: <your API token>\n\
                start_date: 2024-01-01\n\
                end_date: 2024-12-31",
                path.display()
            )));
        }

        let config: IndicoConfig = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| IndicoError::Config(format!("{}: {e}", path.display())))?
            .try_deserialize()
            .map_err(|e| IndicoError::Config(format!("{}: {e}", path.display())))?;

        Ok(config)
    }

    /// Base URL without a trailing slash, ready to have API paths appended.
    pub fn base_url(&self) -> &str {
        self.indico_instance.trim_end_matches('/')
    }
}

impl fmt::Debug for IndicoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicoConfig")
            .field("indico_instance", &self.indico_instance)
            .field("api_token", &"<redacted>")
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("only_public", &self.only_public)
            .finish()
    }
}
