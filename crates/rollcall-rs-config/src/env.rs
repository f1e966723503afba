//! Environment-variable loader for [`RollcallConfig`].

use crate::model::{ReentryPolicy, RollcallConfig, SinkConfig};
use crate::ConfigError;
use log::{debug, info};

const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SHEET_RANGE: &str = "A1";
const DEFAULT_SHEET_BASE_URL: &str = "https://sheets.googleapis.com";

impl RollcallConfig {
    /// Build the config from the process environment, failing fast on any
    /// missing or malformed variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    ///
    /// Tests use this to avoid mutating process-wide environment state.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let bot_token = required(&lookup, "ROLLCALL_BOT_TOKEN")?;
        let required_channels = optional(&lookup, "ROLLCALL_REQUIRED_CHANNELS")
            .map(|raw| parse_channels(&raw))
            .unwrap_or_default();
        let collect_phone = match optional(&lookup, "ROLLCALL_COLLECT_PHONE") {
            Some(raw) => parse_bool("ROLLCALL_COLLECT_PHONE", &raw)?,
            None => false,
        };
        let reentry = match optional(&lookup, "ROLLCALL_REENTRY") {
            Some(raw) => ReentryPolicy::parse(&raw).map_err(|message| {
                ConfigError::InvalidVar {
                    var: "ROLLCALL_REENTRY",
                    message,
                }
            })?,
            None => ReentryPolicy::default(),
        };
        let poll_timeout_secs = match optional(&lookup, "ROLLCALL_POLL_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                var: "ROLLCALL_POLL_TIMEOUT_SECS",
                message: format!("expected an integer number of seconds, got `{raw}`"),
            })?,
            None => DEFAULT_POLL_TIMEOUT_SECS,
        };
        let sink = sink_from_lookup(&lookup)?;

        let config = RollcallConfig {
            bot_token,
            required_channels,
            collect_phone,
            reentry,
            poll_timeout_secs,
            sink,
        };
        config.validate()?;
        info!(
            "configuration loaded (sink={}, gate_channels={}, collect_phone={})",
            config.sink.kind(),
            config.required_channels.len(),
            config.collect_phone
        );
        Ok(config)
    }
}

/// Resolve the sink variant and its variant-specific required keys.
fn sink_from_lookup(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<SinkConfig, ConfigError> {
    let kind = required(lookup, "ROLLCALL_SINK")?;
    debug!("resolving sink configuration (kind={})", kind.trim());
    match kind.trim().to_ascii_lowercase().as_str() {
        "relay" => Ok(SinkConfig::Relay {
            chat: required(lookup, "ROLLCALL_RELAY_CHAT")?,
        }),
        "csv" => Ok(SinkConfig::Csv {
            path: required(lookup, "ROLLCALL_CSV_PATH")?,
        }),
        "sqlite" => Ok(SinkConfig::Sqlite {
            path: required(lookup, "ROLLCALL_DB_PATH")?,
        }),
        "sheet" => Ok(SinkConfig::CloudSheet {
            spreadsheet_id: required(lookup, "ROLLCALL_SHEET_ID")?,
            token: required(lookup, "ROLLCALL_SHEET_TOKEN")?,
            range: optional(lookup, "ROLLCALL_SHEET_RANGE")
                .unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
            base_url: optional(lookup, "ROLLCALL_SHEET_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SHEET_BASE_URL.to_string()),
        }),
        "webhook" => Ok(SinkConfig::Webhook {
            url: required(lookup, "ROLLCALL_WEBHOOK_URL")?,
        }),
        other => Err(ConfigError::InvalidVar {
            var: "ROLLCALL_SINK",
            message: format!(
                "expected one of `relay`, `csv`, `sqlite`, `sheet`, `webhook`, got `{other}`"
            ),
        }),
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ConfigError> {
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var).filter(|value| !value.trim().is_empty())
}

/// Split a comma-separated channel list, normalizing each handle to `@name`.
fn parse_channels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| format!("@{}", part.trim_start_matches('@')))
        .collect()
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidVar {
            var,
            message: format!("expected a boolean, got `{other}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConfigError, ReentryPolicy, RollcallConfig, SinkConfig};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|value| value.to_string())
    }

    #[test]
    fn minimal_relay_config_loads_with_defaults() {
        let config = RollcallConfig::from_lookup(lookup(&[
            ("ROLLCALL_BOT_TOKEN", "123:abc"),
            ("ROLLCALL_SINK", "relay"),
            ("ROLLCALL_RELAY_CHAT", "@intake_archive"),
        ]))
        .expect("config");

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.required_channels, Vec::<String>::new());
        assert_eq!(config.collect_phone, false);
        assert_eq!(config.reentry, ReentryPolicy::Restart);
        assert_eq!(config.poll_timeout_secs, 30);
        assert_eq!(
            config.sink,
            SinkConfig::Relay {
                chat: "@intake_archive".to_string()
            }
        );
    }

    #[test]
    fn missing_token_fails_before_anything_else() {
        let err = RollcallConfig::from_lookup(lookup(&[("ROLLCALL_SINK", "relay")]))
            .expect_err("must fail");
        assert_eq!(err, ConfigError::MissingVar("ROLLCALL_BOT_TOKEN"));
    }

    #[test]
    fn each_sink_variant_names_its_missing_key() {
        for (kind, var) in [
            ("relay", "ROLLCALL_RELAY_CHAT"),
            ("csv", "ROLLCALL_CSV_PATH"),
            ("sqlite", "ROLLCALL_DB_PATH"),
            ("sheet", "ROLLCALL_SHEET_ID"),
            ("webhook", "ROLLCALL_WEBHOOK_URL"),
        ] {
            let err = RollcallConfig::from_lookup(lookup(&[
                ("ROLLCALL_BOT_TOKEN", "123:abc"),
                ("ROLLCALL_SINK", kind),
            ]))
            .expect_err("must fail");
            assert_eq!(err, ConfigError::MissingVar(var), "sink kind {kind}");
        }
    }

    #[test]
    fn unknown_sink_kind_is_rejected() {
        let err = RollcallConfig::from_lookup(lookup(&[
            ("ROLLCALL_BOT_TOKEN", "123:abc"),
            ("ROLLCALL_SINK", "postgres"),
        ]))
        .expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                var: "ROLLCALL_SINK",
                ..
            }
        ));
    }

    #[test]
    fn channel_list_is_split_and_normalized() {
        let config = RollcallConfig::from_lookup(lookup(&[
            ("ROLLCALL_BOT_TOKEN", "123:abc"),
            ("ROLLCALL_REQUIRED_CHANNELS", "kh_journey, @second_channel ,"),
            ("ROLLCALL_SINK", "webhook"),
            ("ROLLCALL_WEBHOOK_URL", "https://example.test/hook"),
        ]))
        .expect("config");
        assert_eq!(
            config.required_channels,
            vec!["@kh_journey".to_string(), "@second_channel".to_string()]
        );
    }

    #[test]
    fn sheet_sink_applies_range_and_base_url_defaults() {
        let config = RollcallConfig::from_lookup(lookup(&[
            ("ROLLCALL_BOT_TOKEN", "123:abc"),
            ("ROLLCALL_SINK", "sheet"),
            ("ROLLCALL_SHEET_ID", "sheet-1"),
            ("ROLLCALL_SHEET_TOKEN", "ya29.token"),
        ]))
        .expect("config");
        assert_eq!(
            config.sink,
            SinkConfig::CloudSheet {
                spreadsheet_id: "sheet-1".to_string(),
                token: "ya29.token".to_string(),
                range: "A1".to_string(),
                base_url: "https://sheets.googleapis.com".to_string(),
            }
        );
    }

    #[test]
    fn reentry_and_phone_flags_parse() {
        let config = RollcallConfig::from_lookup(lookup(&[
            ("ROLLCALL_BOT_TOKEN", "123:abc"),
            ("ROLLCALL_COLLECT_PHONE", "true"),
            ("ROLLCALL_REENTRY", "resume"),
            ("ROLLCALL_SINK", "csv"),
            ("ROLLCALL_CSV_PATH", "intake.csv"),
        ]))
        .expect("config");
        assert_eq!(config.collect_phone, true);
        assert_eq!(config.reentry, ReentryPolicy::Resume);

        let err = RollcallConfig::from_lookup(lookup(&[
            ("ROLLCALL_BOT_TOKEN", "123:abc"),
            ("ROLLCALL_REENTRY", "sometimes"),
            ("ROLLCALL_SINK", "csv"),
            ("ROLLCALL_CSV_PATH", "intake.csv"),
        ]))
        .expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                var: "ROLLCALL_REENTRY",
                ..
            }
        ));
    }
}
