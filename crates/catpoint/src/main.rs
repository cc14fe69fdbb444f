use std::sync::Arc;

use anyhow::Context;
use catpoint::cli::Cli;
use catpoint::cli::CliCommand;
use catpoint::config::LoggingConfig;
use catpoint::daemon;
use catpoint::security::TracingListener;
use catpoint::Config;
use catpoint::SecurityController;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration, falling back to defaults when no file is given
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    init_tracing(&config.logging);

    let repository = config
        .repository
        .open()
        .context("Failed to open repository")?;
    let classifier = config
        .camera
        .classifier
        .build()
        .context("Failed to set up image classifier")?;

    let mut controller = SecurityController::new(repository, classifier);
    controller.add_status_listener(Arc::new(TracingListener));

    match cli.command {
        CliCommand::Control(command) => {
            let report = command.execute(&mut controller)?;
            println!("{}", report);
        }
        CliCommand::Run => {
            tracing::info!("catpoint starting");

            let (request_tx, request_rx) = mpsc::channel(daemon::REQUEST_CHANNEL_SIZE);
            let (shutdown_tx, shutdown_rx) = oneshot::channel();

            // Detached: a blocked stdin read must not hold up shutdown.
            std::thread::spawn(move || daemon::forward_stdin_requests(request_tx));
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => tracing::info!("Received shutdown signal"),
                    Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
                }
                shutdown_tx.send(()).ok();
            });

            tracing::info!("Press Ctrl+C to exit");
            let controller =
                daemon::serve(controller, config.camera.scan_interval(), request_rx, shutdown_rx)
                    .await;

            tracing::info!(
                "catpoint shutdown complete (arming: {}, alarm: {})",
                controller.arming_status()?,
                controller.alarm_status()?
            );
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(logging.targets())
        .init();
}
