// Suite configuration
//
// Resolution order, later wins:
//   1. built-in defaults (the public FashionHub deployment, headless Chromium)
//   2. JSON file named by STOREFRONT_CONFIG
//   3. STOREFRONT_BASE_URL / STOREFRONT_BROWSER / STOREFRONT_HEADLESS /
//      STOREFRONT_SCREENSHOT_DIR

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Public deployment of the storefront under test.
pub const DEFAULT_BASE_URL: &str = "https://ecommercepracticeportal.netlify.app/";

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "STOREFRONT_CONFIG";

/// Browser engine to launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" | "safari" => Ok(BrowserKind::Webkit),
            other => Err(Error::Config(format!("unknown browser '{other}'"))),
        }
    }
}

/// Per-operation time budgets.
///
/// Serialized as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeouts {
    #[serde(with = "millis")]
    pub short: Duration,
    #[serde(with = "millis")]
    pub medium: Duration,
    #[serde(with = "millis")]
    pub long: Duration,
    #[serde(with = "millis")]
    pub very_long: Duration,
    /// How long a single-element operation waits for its element to appear
    #[serde(with = "millis")]
    pub action: Duration,
    /// Default budget for `expect(...)` assertions
    #[serde(with = "millis")]
    pub assertion: Duration,
    #[serde(with = "millis")]
    pub dom_ready: Duration,
    #[serde(with = "millis")]
    pub network_idle: Duration,
    #[serde(with = "millis")]
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            short: Duration::from_secs(2),
            medium: Duration::from_secs(5),
            long: Duration::from_secs(10),
            very_long: Duration::from_secs(30),
            action: Duration::from_secs(10),
            assertion: Duration::from_secs(5),
            dom_ready: Duration::from_secs(10),
            network_idle: Duration::from_secs(15),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Configuration shared by every scenario in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuiteConfig {
    pub base_url: Url,
    pub browser: BrowserKind,
    pub headless: bool,
    pub screenshot_dir: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            browser: BrowserKind::default(),
            headless: true,
            screenshot_dir: PathBuf::from("test-results"),
            timeouts: Timeouts::default(),
        }
    }
}

impl SuiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, then the STOREFRONT_CONFIG file, then environment overrides.
    pub fn from_env() -> Result<Self> {
        let config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(e).context(format!("reading {}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Parses a JSON document. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.base_url = with_trailing_slash(config.base_url);
        Ok(config)
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(base_url) = lookup("STOREFRONT_BASE_URL") {
            self = self.base_url(&base_url)?;
        }
        if let Some(browser) = lookup("STOREFRONT_BROWSER") {
            self.browser = browser.parse()?;
        }
        if let Some(headless) = lookup("STOREFRONT_HEADLESS") {
            self.headless = parse_bool(&headless)?;
        }
        if let Some(dir) = lookup("STOREFRONT_SCREENSHOT_DIR") {
            self.screenshot_dir = PathBuf::from(dir);
        }
        Ok(self)
    }

    /// Sets the base URL. A trailing slash is added so relative paths join
    /// under it rather than replacing its last segment.
    pub fn base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = with_trailing_slash(Url::parse(base_url)?);
        Ok(self)
    }

    pub fn browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("expected a boolean, got '{other}'"))),
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
