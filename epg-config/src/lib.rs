//! Loader for grabber configuration with YAML + environment overlays.
//!
//! Precedence, lowest first: built-in defaults, YAML sources in the order they
//! were added, then `EPG__`-prefixed environment variables
//! (`EPG__SITE__REGION_ID=8336`). String values may reference other variables
//! as `${VAR}`; they are expanded after merging.
use config::{Config, ConfigError, Environment, File};
pub use epg_common::observability::{LogFormat, LoggingConfig};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Default, Deserialize)]
pub struct EpgConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Everything specific to the upstream guide website.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Region used when listing the channel directory.
    #[serde(default = "default_region_id")]
    pub region_id: u32,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// Cookie sent with listing requests; it pins the guide region.
    #[serde(default = "default_cookie")]
    pub cookie: String,
    /// User agent for the channel directory and detail pages.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// How many detail pages may be in flight at once while enriching.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            region_id: default_region_id(),
            accept_language: default_accept_language(),
            cookie: default_cookie(),
            user_agent: default_user_agent(),
            detail_concurrency: default_detail_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.foxtel.com.au".into()
}
fn default_region_id() -> u32 {
    8336
}
fn default_accept_language() -> String {
    "en-US,en;".into()
}
fn default_cookie() -> String {
    "AAMC_foxtel_0=REGION|6".into()
}
fn default_user_agent() -> String {
    "insomnia/2022.7.5".into()
}
fn default_detail_concurrency() -> usize {
    4
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_retries() -> usize {
    2
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
///
/// The `config` crate lets later sources win, so the environment layer is
/// held back and added last in [`load`](Self::load).
pub struct EpgConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Environment,
}

impl Default for EpgConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl EpgConfigLoader {
    /// Start with defaults plus `EPG__` env overrides.
    ///
    /// ```
    /// use epg_config::EpgConfigLoader;
    ///
    /// let config = EpgConfigLoader::new()
    ///     .with_yaml_str("site:\n  region_id: 1234")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.site.region_id, 1234);
    /// assert_eq!(config.site.base_url, "https://www.foxtel.com.au");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env: Environment::with_prefix("EPG")
                .separator("__")
                .try_parsing(true),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file) but a missing file is not an error.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use epg_config::EpgConfigLoader;
    ///
    /// unsafe { std::env::set_var("GUIDE_COOKIE", "AAMC_foxtel_0=REGION|2"); }
    ///
    /// let config = EpgConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// site:
    ///   cookie: "${GUIDE_COOKIE}"
    /// http:
    ///   retries: 0
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.site.cookie, "AAMC_foxtel_0=REGION|2");
    /// assert_eq!(config.http.retries, 0);
    /// assert_eq!(config.http.timeout_secs, 15);
    ///
    /// unsafe { std::env::remove_var("GUIDE_COOKIE"); }
    /// ```
    pub fn load(self) -> Result<EpgConfig, ConfigError> {
        let cfg = self.builder.add_source(self.env).build()?;

        let mut v: Value = cfg.try_deserialize()?;
        if v.is_null() {
            v = Value::Object(Default::default());
        }
        expand_env_in_value(&mut v);

        let typed: EpgConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        if typed.site.detail_concurrency == 0 {
            return Err(ConfigError::Message(
                "site.detail_concurrency must be at least 1".into(),
            ));
        }

        Ok(typed)
    }
}
