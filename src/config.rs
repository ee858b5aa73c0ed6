use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{Confirm, Input};
use std::io::Write;
use std::path::PathBuf;

/// API used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://api-tecsomobi.onrender.com";

/// Charge Admin - charging point administration console
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base URL of the admin API
    #[arg(short = 'u', long, env = "API_BASE_URL")]
    pub api_url: Option<String>,

    /// Previously issued admin token (validated at startup)
    #[arg(short = 't', long, env = "ADMIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Also write logs to this file
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10")]
    pub connect_timeout: u64,

    /// Forget a stored token when the profile check rejects it
    #[arg(long, env = "CLEAR_STALE_CREDENTIAL", default_value = "false")]
    pub clear_stale_credential: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    // API
    pub api_base_url: String,
    pub initial_token: Option<String>,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    // Session
    pub clear_stale_credential: bool,

    // Logging
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > .env > defaults
    ///
    /// Falls back to an interactive prompt for the API URL on first run.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut args = CliArgs::parse();
        if needs_interactive_setup(&args) {
            args.api_url = Some(run_interactive_setup()?);
        }

        Ok(Self::from_args(args))
    }

    /// Build configuration from already parsed arguments
    pub fn from_args(args: CliArgs) -> Self {
        Config {
            api_base_url: args
                .api_url
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            initial_token: args.token.filter(|t| !t.is_empty()),
            http_connect_timeout: args.connect_timeout,
            http_request_timeout: args.request_timeout,
            clear_stale_credential: args.clear_stale_credential,
            log_level: args.log_level,
            log_file: args.log_file.map(|s| expand_tilde(&s)),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            anyhow::bail!(
                "API_BASE_URL must start with http:// or https://: {}",
                self.api_base_url
            );
        }

        if self.http_request_timeout == 0 {
            anyhow::bail!("HTTP_REQUEST_TIMEOUT must be greater than zero");
        }

        if let Some(parent) = self.log_file.as_ref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                anyhow::bail!("LOG_FILE directory does not exist: {}", parent.display());
            }
        }

        Ok(())
    }
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// === Interactive Setup ===

/// First run: no .env file and no API URL given
pub fn needs_interactive_setup(args: &CliArgs) -> bool {
    let env_file_exists = std::path::Path::new(".env").exists();
    !env_file_exists && args.api_url.is_none()
}

/// Ask for the API URL and optionally persist it to .env
pub fn run_interactive_setup() -> Result<String> {
    println!();
    println!("Charge Admin - first time setup");
    println!();

    let api_url: String = Input::new()
        .with_prompt("Admin API base URL (API_BASE_URL)")
        .default(DEFAULT_API_URL.to_string())
        .interact_text()
        .context("Failed to read API_BASE_URL")?;

    let save_to_env = Confirm::new()
        .with_prompt("Save configuration to .env file?")
        .default(true)
        .interact()
        .context("Failed to read save confirmation")?;

    if save_to_env {
        save_env_file(&api_url)?;
        println!("Configuration saved to .env file");
    }

    println!();
    Ok(api_url)
}

fn env_file_content(api_url: &str) -> String {
    format!(
        r#"# Charge Admin Configuration
# Generated by interactive setup

# Admin API base URL
API_BASE_URL={}

# Logging (trace, debug, info, warn, error)
LOG_LEVEL=info

# HTTP timeouts in seconds
HTTP_REQUEST_TIMEOUT=30
HTTP_CONNECT_TIMEOUT=10
"#,
        api_url
    )
}

/// Save configuration to .env file
fn save_env_file(api_url: &str) -> Result<()> {
    let mut file = std::fs::File::create(".env").context("Failed to create .env file")?;
    file.write_all(env_file_content(api_url).as_bytes())
        .context("Failed to write .env file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            log_level: "info".to_string(),
            request_timeout: 30,
            connect_timeout: 10,
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/logs/admin.log");
        assert!(path.to_string_lossy().contains("logs/admin.log"));
        assert!(!path.to_string_lossy().starts_with("~"));

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_tilde_just_tilde() {
        assert_eq!(expand_tilde("~"), PathBuf::from("~"));
        assert_eq!(expand_tilde("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(args());
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.initial_token, None);
        assert!(!config.clear_stale_credential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_url_trailing_slash_and_token() {
        let config = Config::from_args(CliArgs {
            api_url: Some("http://localhost:3000/".to_string()),
            token: Some("abc".to_string()),
            ..args()
        });
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.initial_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let config = Config::from_args(CliArgs {
            token: Some(String::new()),
            ..args()
        });
        assert_eq!(config.initial_token, None);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config::from_args(CliArgs {
            api_url: Some("localhost:3000".to_string()),
            ..args()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config::from_args(CliArgs {
            request_timeout: 0,
            ..args()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_file_content() {
        let content = env_file_content("http://localhost:3000");
        assert!(content.contains("API_BASE_URL=http://localhost:3000"));
        assert!(content.contains("LOG_LEVEL=info"));
    }

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::parse_from([
            "charge-admin",
            "-u",
            "http://localhost:3000",
            "--request-timeout",
            "5",
            "--clear-stale-credential",
        ]);
        assert_eq!(args.api_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(args.request_timeout, 5);
        assert!(args.clear_stale_credential);
    }
}
