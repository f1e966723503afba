//! Configuration schema for the rollcall bot.

use crate::ConfigError;

/// What happens when a user sends the start command mid-flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReentryPolicy {
    /// Drop the in-progress session and begin again from the first step.
    #[default]
    Restart,
    /// Keep the session and repeat the current step's prompt.
    Resume,
}

impl ReentryPolicy {
    /// Parse the `ROLLCALL_REENTRY` value.
    pub(crate) fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restart" => Ok(ReentryPolicy::Restart),
            "resume" => Ok(ReentryPolicy::Resume),
            other => Err(format!("expected `restart` or `resume`, got `{other}`")),
        }
    }
}

/// Persistence target selected at startup, with its variant-specific keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    /// Relay a formatted summary to a broadcast chat.
    Relay { chat: String },
    /// Append rows to a local CSV spreadsheet file.
    Csv { path: String },
    /// Insert rows into a local SQLite database.
    Sqlite { path: String },
    /// Append rows to a cloud spreadsheet through its HTTP API.
    CloudSheet {
        spreadsheet_id: String,
        token: String,
        range: String,
        base_url: String,
    },
    /// Submit each record as a JSON payload to a webhook.
    Webhook { url: String },
}

impl SinkConfig {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SinkConfig::Relay { .. } => "relay",
            SinkConfig::Csv { .. } => "csv",
            SinkConfig::Sqlite { .. } => "sqlite",
            SinkConfig::CloudSheet { .. } => "sheet",
            SinkConfig::Webhook { .. } => "webhook",
        }
    }
}

/// Immutable process configuration, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollcallConfig {
    /// Transport credential.
    pub bot_token: String,
    /// Channels the user must be a member of; empty disables the gate.
    pub required_channels: Vec<String>,
    /// Whether the flow ends with a contact-share step.
    pub collect_phone: bool,
    /// Behavior for a repeated start command mid-flow.
    pub reentry: ReentryPolicy,
    /// Long-poll timeout passed to the transport.
    pub poll_timeout_secs: u64,
    /// Selected persistence target.
    pub sink: SinkConfig,
}

impl RollcallConfig {
    /// Validate invariants that the per-variable parsers cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "ROLLCALL_BOT_TOKEN",
                message: "must not be blank".to_string(),
            });
        }
        if self.required_channels.iter().any(|c| c.len() <= 1) {
            return Err(ConfigError::InvalidVar {
                var: "ROLLCALL_REQUIRED_CHANNELS",
                message: "channel handles must not be blank".to_string(),
            });
        }
        if self.poll_timeout_secs == 0 {
            return Err(ConfigError::InvalidVar {
                var: "ROLLCALL_POLL_TIMEOUT_SECS",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
