use anyhow::{Context, Result};
use std::io::BufRead;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use kinetic_table::director::DirectorHandle;
use kinetic_table::outputs::ConsoleRenderer;
use kinetic_table::services::llm::OllamaClient;
use kinetic_table::{ControlLoop, CreativeDirector, TableConfig};

/// Forwards console lines to the director. Runs on a plain thread so a
/// pending read never holds up shutdown.
fn spawn_console_input(director: DirectorHandle) {
    std::thread::spawn(move || {
        println!("Type a message and press Enter to talk to the table. Ctrl+C quits.");
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            tracing::debug!(chars = text.len(), "Console input dispatched");
            if !director.receive_message(text) {
                tracing::warn!("Director is gone; console input closed");
                break;
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    // 2. Configuration
    let config = TableConfig::load().context("loading configuration")?;
    tracing::info!(
        rows = config.rows,
        cols = config.cols,
        max_height_mm = config.max_height,
        max_speed_mm_s = config.max_speed,
        model = %config.model,
        url = %config.inference_url,
        "Kinetic table booting..."
    );

    // 3. Creative director on its own task
    let backend = OllamaClient::new(config.llm());
    let (director, director_task) = CreativeDirector::new(config.director(), backend).spawn();

    // 4. Viewer input
    spawn_console_input(director.clone());

    // 5. Ctrl+C ends the control loop
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupted by user");
                interrupt.cancel();
            }
            Err(e) => tracing::warn!("Cannot listen for Ctrl+C: {}", e),
        }
    });

    // 6. Control loop on the main task
    let mut control = ControlLoop::new(config.actuator(), config.frame_rate_hz);
    let mut renderer = ConsoleRenderer::new(u64::from(config.frame_rate_hz) * 5);
    let outcome = control.run(&director, &mut renderer, &cancel).await;

    // Shutdown may wait out one in-flight model call.
    director.stop();
    if let Err(e) = director_task.await {
        tracing::warn!("Director task ended abnormally: {}", e);
    }

    let frames = outcome.context("control loop failed")?;
    tracing::info!(frames, "Simulator closed. Goodbye.");
    Ok(())
}
