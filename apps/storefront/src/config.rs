use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use storefront_core::DEFAULT_CATALOG_URL;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_url: String,
    pub banner_dismiss_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.into(),
            banner_dismiss_secs: 5,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    catalog_url: Option<String>,
    banner_dismiss_secs: Option<u64>,
    log_filter: Option<String>,
}

impl Settings {
    pub fn banner_dismiss(&self) -> Duration {
        Duration::from_secs(self.banner_dismiss_secs)
    }

    pub fn catalog_url(&self) -> Result<Url> {
        let url = Url::parse(self.catalog_url.trim())
            .with_context(|| format!("invalid catalog url '{}'", self.catalog_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("catalog url '{url}' must use http or https");
        }
        Ok(url)
    }
}

/// Defaults, then the optional TOML file, then environment overrides.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.catalog_url {
        settings.catalog_url = v;
    }
    if let Some(v) = file_cfg.banner_dismiss_secs {
        settings.banner_dismiss_secs = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("STOREFRONT_CATALOG_URL") {
        settings.catalog_url = v;
    }
    if let Some(v) = lookup("APP__CATALOG_URL") {
        settings.catalog_url = v;
    }

    if let Some(v) = lookup("APP__BANNER_DISMISS_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.banner_dismiss_secs = parsed;
        }
    }

    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
