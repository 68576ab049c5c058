use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level configuration, built once at startup and handed to the stages
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Text extraction settings
    #[serde(default)]
    pub ocr: OcrConfig,
    /// TMDB search settings
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// OpenAI summarization settings
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Whether items are summarized automatically
    #[serde(default)]
    pub summary_policy: SummaryPolicy,
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Which OCR backend to use
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackend {
    /// Local Tesseract binary
    #[default]
    Tesseract,
    /// OCR.space web service
    OcrSpace,
}

/// Whether the pipeline calls the summarizer for every item
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPolicy {
    /// Summarize every item that has a real overview
    #[default]
    Automatic,
    /// Use the overview as-is
    Skip,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    #[serde(default)]
    pub backend: OcrBackend,
    /// Path or name of the tesseract executable
    #[serde(default = "default_tesseract_cmd")]
    pub tesseract_cmd: String,
    /// OCR.space API key; the public demo key is used when unset
    pub api_key: Option<String>,
    #[serde(default = "default_ocr_base_url")]
    pub base_url: String,
    /// Language hint, tesseract codes
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Request timeout in seconds
    #[serde(default = "default_ocr_timeout")]
    pub timeout: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::default(),
            tesseract_cmd: default_tesseract_cmd(),
            api_key: None,
            base_url: default_ocr_base_url(),
            languages: default_languages(),
            timeout: default_ocr_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    /// Optional response language (e.g. "he-IL")
    pub language: Option<String>,
    /// Fetch series details when the search hit lacks an episode count
    #[serde(default)]
    pub fetch_details: bool,
    /// Request timeout in seconds
    #[serde(default = "default_tmdb_timeout")]
    pub timeout: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_base_url(),
            language: None,
            fetch_details: false,
            timeout: default_tmdb_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_openai_timeout")]
    pub timeout: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: default_openai_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// Default value functions
fn default_tesseract_cmd() -> String {
    "tesseract".to_string()
}

fn default_ocr_base_url() -> String {
    "https://api.ocr.space".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["heb".to_string(), "eng".to_string()]
}

fn default_ocr_timeout() -> u64 {
    30
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_timeout() -> u64 {
    10
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    200
}

fn default_openai_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with HIGHLIGHTS__ prefix
    /// 2. config.toml file in current directory
    /// 3. Plain secret variables (TMDB_API_KEY, OPENAI_API_KEY, OCR_SPACE_API_KEY, TESSERACT_CMD)
    /// 4. Default values
    ///
    /// Environment variable format: HIGHLIGHTS__TMDB__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = load_config()?;
        config.apply_env_fallbacks(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Fill unset secrets from plain variables via `lookup`
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.ocr.api_key.is_none() {
            self.ocr.api_key = non_empty("OCR_SPACE_API_KEY");
        }
        if self.tmdb.api_key.is_none() {
            self.tmdb.api_key = non_empty("TMDB_API_KEY");
        }
        if self.openai.api_key.is_none() {
            self.openai.api_key = non_empty("OPENAI_API_KEY");
        }
        if let Some(cmd) = non_empty("TESSERACT_CMD") {
            if self.ocr.tesseract_cmd == default_tesseract_cmd() {
                self.ocr.tesseract_cmd = cmd;
            }
        }
    }
}

/// Load configuration from `config.toml` and `HIGHLIGHTS__` variables only
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: HIGHLIGHTS__OPENAI__API_KEY
        .add_source(
            Environment::with_prefix("HIGHLIGHTS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
