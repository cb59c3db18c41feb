//! Runtime configuration.
//!
//! A [`Config`] is built once at process start and handed to whatever needs it. Nothing in the
//! crate reads the environment on its own. Values are layered in this order, later layers
//! winning:
//!
//! 1. Built-in defaults
//! 2. The TOML file at `$MAKALAH_CONFIG`, or [`Config::default_path`] when that file exists
//! 3. Environment variables (a `.env` file in the working directory is loaded first)
//!
//! ```toml
//! # ~/.config/makalah/config.toml
//! model = "gemini-2.5-pro"
//! temperature = 0.5
//! timeout_secs = 180.0
//! port = 8080
//! ```

use super::*;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "MAKALAH_CONFIG";
/// Public Gemini API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration shared by the generation pipeline and the HTTP surface.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Gemini API key. Only required for operations that call the model.
  #[serde(skip_serializing)]
  pub api_key:      Option<String>,
  /// Model used for generation
  pub model:        Model,
  /// Sampling temperature in `0.0..=2.0`
  pub temperature:  f64,
  /// Scheme and host of the Gemini API
  pub base_url:     String,
  /// Upper bound on a single model call, in seconds. Fractions are kept.
  pub timeout_secs: f64,
  /// Interface the HTTP server binds to
  pub host:         String,
  /// Port the HTTP server binds to
  pub port:         u16,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_key:      None,
      model:        Model::Gemini25Flash,
      temperature:  0.5,
      base_url:     DEFAULT_BASE_URL.to_owned(),
      timeout_secs: 120.0,
      host:         "localhost".to_owned(),
      port:         8000,
    }
  }
}

impl Config {
  /// Platform configuration file location, e.g. `~/.config/makalah/config.toml` on Linux.
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("makalah").join("config.toml")
  }

  /// Loads configuration from every layer.
  ///
  /// An explicit `$MAKALAH_CONFIG` path must exist. The default path is optional.
  pub fn load() -> Result<Self> {
    if let Ok(path) = dotenvy::dotenv() {
      debug!("Loaded environment from {}", path.display());
    }

    let config = match std::env::var_os(CONFIG_PATH_VAR) {
      Some(path) => Self::from_path(PathBuf::from(path))?,
      None => {
        let path = Self::default_path();
        if path.exists() {
          Self::from_path(path)?
        } else {
          trace!("No configuration file at {}, using defaults", path.display());
          Self::default()
        }
      },
    };

    config.with_overrides(|key| std::env::var(key).ok())
  }

  /// Reads a TOML configuration file. Missing keys keep their defaults.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
      MakalahError::Config(format!("Cannot read configuration file {}: {e}", path.display()))
    })?;
    let config: Config = toml::from_str(&content)?;
    debug!("Loaded configuration from {}", path.display());
    config.validate()
  }

  /// Applies `GEMINI_API_KEY` and the `MAKALAH_*` variables found through `lookup`.
  pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    if let Some(key) = lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty()) {
      self.api_key = Some(key.trim().to_owned());
    }
    if let Some(model) = lookup("MAKALAH_MODEL") {
      self.model = model.parse()?;
    }
    if let Some(temperature) = lookup("MAKALAH_TEMPERATURE") {
      self.temperature = parse_var("MAKALAH_TEMPERATURE", &temperature)?;
    }
    if let Some(base_url) = lookup("MAKALAH_BASE_URL") {
      self.base_url = base_url;
    }
    if let Some(timeout) = lookup("MAKALAH_TIMEOUT_SECS") {
      self.timeout_secs = parse_var("MAKALAH_TIMEOUT_SECS", &timeout)?;
    }
    if let Some(host) = lookup("MAKALAH_HOST") {
      self.host = host;
    }
    if let Some(port) = lookup("MAKALAH_PORT") {
      self.port = parse_var("MAKALAH_PORT", &port)?;
    }
    self.validate()
  }

  /// Sets the API key.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  /// Sets the model.
  pub fn with_model(mut self, model: Model) -> Self {
    self.model = model;
    self
  }

  /// Sets the API base URL, mostly useful for pointing at a proxy or a test server.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  /// Sets the model call timeout.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout_secs = timeout.as_secs_f64();
    self
  }

  /// The API key, or a [`MakalahError::Config`] explaining how to provide one.
  pub fn api_key(&self) -> Result<&str> {
    self.api_key.as_deref().ok_or_else(|| {
      MakalahError::Config(format!(
        "{API_KEY_VAR} is not set. Export it or add it to a .env file in the working directory."
      ))
    })
  }

  /// Fails fast when no API key is configured.
  pub fn require_api_key(self) -> Result<Self> {
    self.api_key()?;
    Ok(self)
  }

  /// The model call timeout.
  pub fn timeout(&self) -> Duration {
    Duration::try_from_secs_f64(self.timeout_secs).unwrap_or_default()
  }

  /// Checks value ranges that serde cannot express.
  fn validate(self) -> Result<Self> {
    if !(0.0..=2.0).contains(&self.temperature) {
      return Err(MakalahError::Config(format!(
        "temperature must be between 0.0 and 2.0, got {}",
        self.temperature
      )));
    }
    if !(self.timeout_secs.is_finite() && self.timeout_secs > 0.0) {
      return Err(MakalahError::Config(format!(
        "timeout_secs must be a positive number of seconds, got {}",
        self.timeout_secs
      )));
    }
    Url::parse(&self.base_url)
      .map_err(|e| MakalahError::Config(format!("invalid base_url {:?}: {e}", self.base_url)))?;
    Ok(self)
  }
}

impl std::fmt::Debug for Config {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Config")
      .field("api_key", &self.api_key.as_ref().map(|_| "***"))
      .field("model", &self.model)
      .field("temperature", &self.temperature)
      .field("base_url", &self.base_url)
      .field("timeout_secs", &self.timeout_secs)
      .field("host", &self.host)
      .field("port", &self.port)
      .finish()
  }
}

/// Parses an environment value, naming the variable in the error.
fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
  T: FromStr,
  T::Err: Display, {
  value.trim().parse().map_err(|e| MakalahError::Config(format!("invalid {name} {value:?}: {e}")))
}
