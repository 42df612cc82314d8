//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::RegistratorConfig;

const CONFIG_FILE_VAR: &str = "REGISTRATOR_CONFIG_FILE";
const DEFAULT_CONFIG_FILE: &str = "/etc/registrator/registrator.toml";

impl RegistratorConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var(CONFIG_FILE_VAR)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: RegistratorConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply every variable `lookup` knows about on top of `self`.
    /// Numeric variables that fail to parse leave the current value alone.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("SVC_PREFIX") {
            self.service_prefix = prefix;
        }
        if let Some(agent) = lookup("LOCAL_CONSUL_AGENT") {
            self.consul_agent = agent;
        }
        if let Some(token) = lookup("CONSUL_HTTP_TOKEN") {
            self.consul_token = token;
        }
        if let Some(delay) = lookup("STARTUP_DELAY_TIMER").and_then(|s| s.parse().ok()) {
            self.startup_delay_secs = delay;
        }
        if let Some(url) = lookup("RANCHER_METADATA_URL") {
            self.metadata_url = url;
        }
        if let Some(socket) = lookup("DOCKER_SOCKET") {
            self.docker_socket = socket;
        }
        if let Some(label) = lookup("REGISTRATOR_NAME_LABEL") {
            self.name_label = label;
        }
        if let Some(timeout) = lookup("REGISTRATOR_HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.http_timeout_secs = timeout;
        }
        self
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        validate_url(&self.consul_agent, "consul_agent")?;
        validate_url(&self.metadata_url, "metadata_url")?;
        if self.name_label.is_empty() {
            return Err("name_label must not be empty".to_string());
        }
        if self.http_timeout_secs == 0 {
            return Err("http_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}

fn validate_url(url: &str, name: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err(format!("{} must not be empty", name));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!("{} must be an http(s) URL, got: {}", name, url));
    }
    Ok(())
}
