use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context};
use url::Url;

pub const CONFIG_FILE: &str = "gesture_panel.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub list_path: String,
    pub mutate_path: String,
    pub test_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            list_path: "/api/gestures".into(),
            mutate_path: "/api/gestures".into(),
            test_path: "/api/test_gesture".into(),
        }
    }
}

impl ClientConfig {
    pub fn with_server_url(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Joins the base URL and `path` with exactly one slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn list_url(&self) -> String {
        self.endpoint(&self.list_path)
    }

    pub fn mutate_url(&self) -> String {
        self.endpoint(&self.mutate_path)
    }

    pub fn test_url(&self) -> String {
        self.endpoint(&self.test_path)
    }

    pub fn validate(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.server_url)
            .with_context(|| format!("invalid server url '{}'", self.server_url))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(anyhow!(
                "unsupported scheme '{other}' in server url '{}'",
                self.server_url
            )),
        }
    }
}

/// Defaults, then `gesture_panel.toml` in the working directory, then environment.
pub fn load_config() -> ClientConfig {
    load_config_from(Path::new(CONFIG_FILE))
}

pub fn load_config_from(path: &Path) -> ClientConfig {
    let mut config = ClientConfig::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut config, &raw);
    }
    apply_env(&mut config, |key| std::env::var(key).ok());

    config
}

fn apply_file(config: &mut ClientConfig, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        tracing::warn!("ignoring malformed {CONFIG_FILE}");
        return;
    };
    if let Some(v) = file_cfg.get("server_url") {
        config.server_url = v.clone();
    }
    if let Some(v) = file_cfg.get("list_path") {
        config.list_path = v.clone();
    }
    if let Some(v) = file_cfg.get("mutate_path") {
        config.mutate_path = v.clone();
    }
    if let Some(v) = file_cfg.get("test_path") {
        config.test_path = v.clone();
    }
}

fn apply_env(config: &mut ClientConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("GESTURE_PANEL_URL") {
        config.server_url = v;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        config.server_url = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
