use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::trace;

use crate::util::{Vars, env_vars};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Hostname reported in alerts (defaults to the system hostname)
    pub hostname: Option<String>,

    /// Seconds between two ticks
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Mount point whose usage is reported as disk usage
    #[serde(default = "default_disk_path")]
    pub disk_path: PathBuf,

    /// Window over which CPU usage is measured, in milliseconds
    #[serde(default = "default_cpu_sample_window_ms")]
    pub cpu_sample_window_ms: u64,

    /// Upper bound for a single notification attempt, in seconds
    #[serde(default = "default_notify_timeout")]
    pub notify_timeout: u64,

    /// Also notify when a metric goes back to normal
    #[serde(default)]
    pub notify_on_recovery: bool,

    #[serde(default)]
    pub notifiers: NotifiersConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: None,
            interval: default_interval(),
            disk_path: default_disk_path(),
            cpu_sample_window_ms: default_cpu_sample_window_ms(),
            notify_timeout: default_notify_timeout(),
            notify_on_recovery: false,
            notifiers: NotifiersConfig::default(),
        }
    }
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_window_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout)
    }

    /// Build the configuration from environment variables.
    ///
    /// A channel is only configured when all of its required variables are present.
    pub fn from_env() -> anyhow::Result<Config> {
        let config = Config::from_vars(&env_vars())?;
        trace!("loaded config from environment: {config:?}");
        Ok(config)
    }

    /// Build the configuration from the variables `from_env` reads.
    pub fn from_vars<F>(vars: &Vars<F>) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let config = Config {
            hostname: vars.get("MONITOR_HOSTNAME"),
            interval: vars.parsed("MONITOR_INTERVAL")?.unwrap_or(defaults.interval),
            disk_path: vars
                .get("MONITOR_DISK_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.disk_path),
            cpu_sample_window_ms: vars
                .parsed("MONITOR_CPU_WINDOW_MS")?
                .unwrap_or(defaults.cpu_sample_window_ms),
            notify_timeout: vars
                .parsed("MONITOR_NOTIFY_TIMEOUT")?
                .unwrap_or(defaults.notify_timeout),
            notify_on_recovery: vars.parsed("MONITOR_NOTIFY_ON_RECOVERY")?.unwrap_or(false),
            notifiers: NotifiersConfig {
                email: EmailConfig::from_vars(vars)?,
                sms: SmsConfig::from_vars(vars),
                webhooks: vars
                    .get("WEBHOOK_URL")
                    .map(|url| vec![WebhookConfig { url }])
                    .unwrap_or_default(),
            },
        };

        Ok(config)
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NotifiersConfig {
    pub email: Option<EmailConfig>,
    pub sms: Option<SmsConfig>,
    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,
}

#[derive(Clone, serde::Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Sender address, also used as SMTP username
    pub address: String,
    pub password: Option<String>,
    pub to: String,
}

impl EmailConfig {
    fn from_vars<F>(vars: &Vars<F>) -> anyhow::Result<Option<EmailConfig>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (Some(smtp_server), Some(address), Some(to)) = (
            vars.get("SMTP_SERVER"),
            vars.get("EMAIL_ADDRESS"),
            vars.get("TO_EMAIL"),
        ) else {
            return Ok(None);
        };

        Ok(Some(EmailConfig {
            smtp_server,
            smtp_port: vars.parsed("SMTP_PORT")?.unwrap_or_else(default_smtp_port),
            address,
            password: vars.get("EMAIL_PASSWORD"),
            to,
        }))
    }
}

// credentials stay out of the logs
impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("address", &self.address)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("to", &self.to)
            .finish()
    }
}

#[derive(Clone, serde::Deserialize)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
    #[serde(default = "SmsConfig::default_api_base")]
    pub api_base: String,
}

impl SmsConfig {
    pub fn default_api_base() -> String {
        String::from("https://api.twilio.com")
    }

    fn from_vars<F>(vars: &Vars<F>) -> Option<SmsConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        Some(SmsConfig {
            account_sid: vars.get("TWILIO_ACCOUNT_SID")?,
            auth_token: vars.get("TWILIO_AUTH_TOKEN")?,
            from_number: vars.get("TWILIO_PHONE_NUMBER")?,
            to_number: vars.get("TO_PHONE_NUMBER")?,
            api_base: vars.get("TWILIO_API_BASE").unwrap_or_else(SmsConfig::default_api_base),
        })
    }
}

impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct WebhookConfig {
    pub url: String,
}

fn default_interval() -> u64 {
    60
}

fn default_disk_path() -> PathBuf {
    PathBuf::from("/")
}

fn default_cpu_sample_window_ms() -> u64 {
    1000
}

fn default_notify_timeout() -> u64 {
    10
}

fn default_smtp_port() -> u16 {
    587
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&file_content)
        .context("Invalid configuration file provided!")
        .inspect(|config| trace!("loaded config: {config:?}"))
}
