use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{ColesListsError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Lists and price API endpoints
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the embedded page data lives
    #[serde(default)]
    pub page: PageConfig,

    /// Rendered document output
    #[serde(default)]
    pub export: ExportConfig,

    /// Trigger control visibility timing
    #[serde(default)]
    pub visibility: VisibilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Shopping lists endpoint (query parameters are appended)
    #[serde(default = "default_lists_url", deserialize_with = "text")]
    pub lists_url: String,

    /// Price endpoint; the product id is appended as the last path segment
    #[serde(default = "default_price_url", deserialize_with = "text")]
    pub price_url: String,

    /// Product page prefix used for links in the rendered document
    #[serde(default = "default_product_url_base", deserialize_with = "text")]
    pub product_url_base: String,

    /// Session cookie header forwarded with page and list requests
    #[serde(default, deserialize_with = "optional_text")]
    pub cookie: Option<String>,

    /// Optional per-request timeout; requests wait indefinitely when unset
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            lists_url: default_lists_url(),
            price_url: default_price_url(),
            product_url_base: default_product_url_base(),
            cookie: None,
            request_timeout_secs: None,
        }
    }
}

fn default_lists_url() -> String {
    "https://www.coles.com.au/api/bff/lists".to_string()
}

fn default_price_url() -> String {
    "https://data-holdings-fastapi-lp22d.ondigitalocean.app/coles/product_search".to_string()
}

fn default_product_url_base() -> String {
    "https://www.coles.com.au/product".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Element id of the embedded JSON data block
    #[serde(default = "default_data_block_id", deserialize_with = "text")]
    pub data_block_id: String,

    /// Field holding the lists API subscription key
    #[serde(default = "default_key_field", deserialize_with = "text")]
    pub key_field: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            data_block_id: default_data_block_id(),
            key_field: default_key_field(),
        }
    }
}

fn default_data_block_id() -> String {
    "__NEXT_DATA__".to_string()
}

fn default_key_field() -> String {
    "BFF_API_SUBSCRIPTION_KEY".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for generated documents (system temp dir when unset)
    #[serde(default, deserialize_with = "optional_text")]
    pub output_dir: Option<String>,

    /// Open the generated document in the default browser
    #[serde(default = "default_true")]
    pub open_browser: bool,

    /// Subject line of the email export
    #[serde(default = "default_email_subject", deserialize_with = "text")]
    pub email_subject: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            open_browser: true,
            email_subject: default_email_subject(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_email_subject() -> String {
    "My Coles Shopping Lists".to_string()
}

impl ExportConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityConfig {
    /// The control is shown on this path and everything below it
    #[serde(default = "default_root_path", deserialize_with = "text")]
    pub root_path: String,

    #[serde(default = "default_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_delay_ms")]
    pub settle_delay_ms: u64,

    /// Fallback path polling interval
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            initial_delay_ms: default_delay_ms(),
            settle_delay_ms: default_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_root_path() -> String {
    "/lists".to_string()
}

fn default_delay_ms() -> u64 {
    500
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl VisibilityConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Load configuration from defaults, then the given file, then env
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // COLES_LISTS_API__COOKIE, COLES_LISTS_VISIBILITY__ROOT_PATH, ...
            .merge(Env::prefixed("COLES_LISTS_").split("__"))
            .extract()
            .map_err(|e| ColesListsError::ConfigError(e.to_string()))?;

        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("coles-lists")
            .join("config.toml")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ColesListsError::ConfigError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Read a single dotted key, e.g. `api.lists_url`
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api.lists_url" => Some(self.api.lists_url.clone()),
            "api.price_url" => Some(self.api.price_url.clone()),
            "api.product_url_base" => Some(self.api.product_url_base.clone()),
            "api.cookie" => self.api.cookie.clone(),
            "api.request_timeout_secs" => self.api.request_timeout_secs.map(|s| s.to_string()),
            "page.data_block_id" => Some(self.page.data_block_id.clone()),
            "page.key_field" => Some(self.page.key_field.clone()),
            "export.output_dir" => self.export.output_dir.clone(),
            "export.open_browser" => Some(self.export.open_browser.to_string()),
            "export.email_subject" => Some(self.export.email_subject.clone()),
            "visibility.root_path" => Some(self.visibility.root_path.clone()),
            "visibility.initial_delay_ms" => Some(self.visibility.initial_delay_ms.to_string()),
            "visibility.settle_delay_ms" => Some(self.visibility.settle_delay_ms.to_string()),
            "visibility.poll_interval_ms" => Some(self.visibility.poll_interval_ms.to_string()),
            _ => {
                return Err(ColesListsError::ConfigError(format!(
                    "Unknown config key: {}",
                    key
                )))
            }
        };

        Ok(value)
    }

    /// Set a single dotted key from its string form
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.lists_url" => self.api.lists_url = value.to_string(),
            "api.price_url" => self.api.price_url = value.to_string(),
            "api.product_url_base" => self.api.product_url_base = value.to_string(),
            "api.cookie" => self.api.cookie = Some(value.to_string()),
            "api.request_timeout_secs" => {
                self.api.request_timeout_secs = Some(parse_number(key, value)?)
            }
            "page.data_block_id" => self.page.data_block_id = value.to_string(),
            "page.key_field" => self.page.key_field = value.to_string(),
            "export.output_dir" => self.export.output_dir = Some(value.to_string()),
            "export.open_browser" => {
                self.export.open_browser = value.parse().map_err(|_| {
                    ColesListsError::ConfigError("open_browser must be true or false".to_string())
                })?
            }
            "export.email_subject" => self.export.email_subject = value.to_string(),
            "visibility.root_path" => self.visibility.root_path = value.to_string(),
            "visibility.initial_delay_ms" => {
                self.visibility.initial_delay_ms = parse_number(key, value)?
            }
            "visibility.settle_delay_ms" => {
                self.visibility.settle_delay_ms = parse_number(key, value)?
            }
            "visibility.poll_interval_ms" => {
                self.visibility.poll_interval_ms = parse_number(key, value)?
            }
            _ => {
                return Err(ColesListsError::ConfigError(format!(
                    "Unknown config key: {}",
                    key
                )))
            }
        }

        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| ColesListsError::ConfigError(format!("{} must be a whole number", key)))
}

/// A text setting. figment types env values, so `COLES_LISTS_API__COOKIE=12345`
/// arrives as a number; any scalar is taken in its text form.
struct Text(String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TextVisitor).map(Text)
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
        Ok(v)
    }

    fn visit_char<E: de::Error>(self, v: char) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Text::deserialize(deserializer).map(|t| t.0)
}

fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Text>::deserialize(deserializer)?.map(|t| t.0))
}
