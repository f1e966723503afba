//! rollcall - entry point for the intake bot.

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use rollcall_rs_config::{RollcallConfig, SinkConfig};
use rollcall_rs_core::IntakeEngine;
use rollcall_rs_protocol::{ChatRef, Transport};
use rollcall_rs_sink::{
    ChannelRelaySink, CloudSheetSink, CsvSink, RecordSink, SqliteSink, WebhookSink,
};
use rollcall_rs_transport::{TelegramApi, UpdatePoller};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(about = "Membership-gated student intake bot")]
#[command(version)]
struct Args {
    /// Validate configuration and exit without polling.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rollcall_rs::init_logging();
    let args = Args::parse();

    // Configuration errors are the only fatal errors: fail before polling.
    let config = RollcallConfig::from_env().context("loading configuration")?;
    if args.check_config {
        println!("configuration ok (sink={})", config.sink.kind());
        return Ok(());
    }

    // The HTTP timeout must outlive a full long-poll cycle.
    let request_timeout = Duration::from_secs(config.poll_timeout_secs + 10);
    let api = Arc::new(TelegramApi::new(config.bot_token.as_str(), request_timeout)?);
    let transport: Arc<dyn Transport> = api.clone();
    let sink = build_sink(&config, transport.clone())?;

    let engine = Arc::new(IntakeEngine::new(&config, transport, sink));
    info!(
        "rollcall started (sink={}, gate_channels={}, poll_timeout={}s)",
        config.sink.kind(),
        config.required_channels.len(),
        config.poll_timeout_secs
    );

    UpdatePoller::new(api, config.poll_timeout_secs)
        .run(|event| {
            let engine = engine.clone();
            async move {
                // Per-session errors stay contained to that session.
                if let Err(err) = engine.handle(event).await {
                    error!("event handling failed (error={})", err);
                }
            }
        })
        .await;
    Ok(())
}

/// Build the configured sink adapter.
fn build_sink(
    config: &RollcallConfig,
    transport: Arc<dyn Transport>,
) -> anyhow::Result<Arc<dyn RecordSink>> {
    let sink: Arc<dyn RecordSink> = match &config.sink {
        SinkConfig::Relay { chat } => {
            Arc::new(ChannelRelaySink::new(transport, ChatRef::parse(chat)))
        }
        SinkConfig::Csv { path } => Arc::new(CsvSink::new(path)?),
        SinkConfig::Sqlite { path } => Arc::new(SqliteSink::new(path)?),
        SinkConfig::CloudSheet {
            spreadsheet_id,
            token,
            range,
            base_url,
        } => Arc::new(CloudSheetSink::new(
            spreadsheet_id.clone(),
            token.clone(),
            range.clone(),
            base_url.clone(),
        )?),
        SinkConfig::Webhook { url } => Arc::new(WebhookSink::new(url.clone())?),
    };
    Ok(sink)
}
