//! Live voice call demo.
//!
//! Dials the generative-language live endpoint with the default microphone
//! and speaker, runs the call until Ctrl-C, then hangs up.
//!
//! # Usage
//!
//! ```bash
//! export FILO_API_KEY="your-api-key"
//! cargo run --example voice_call
//! ```

use filo_voice::{CallConfig, CallSession, GeminiLive};
use std::process::ExitCode;
use tracing::{error, info};

const INSTRUCTION: &str = "You are FILO, an empathetic wellness companion. \
Keep responses calm, supportive, and concise.";

async fn run_call() -> Result<(), Box<dyn std::error::Error>> {
    let connector = GeminiLive::from_env();
    let config = CallConfig::new().with_instruction(INSTRUCTION);

    info!("Dialing...");
    let session = CallSession::dial(&connector, config).await?;

    let mut phases = session.watch_phase();
    tokio::spawn(async move {
        while phases.changed().await.is_ok() {
            info!(status = phases.borrow().label(), "Call status");
        }
    });

    let call = session.clone();
    let driver = tokio::spawn(async move { call.run().await });

    tokio::signal::ctrl_c().await?;
    info!("Hanging up");
    session.hang_up().await;

    driver.await??;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    match run_call().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Call failed");
            ExitCode::FAILURE
        }
    }
}
