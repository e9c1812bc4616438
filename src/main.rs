//! Breath Coach - a guided breathing timer
//!
//! This is the main entry point for the breath-coach application.

use colored::Colorize;
use tracing::{error, info};

use breath_coach::{
    catalog::Catalog,
    config::Config,
    state::Coach,
    tasks::{Command, SessionDriver},
    ui::{input::HELP, input_task, render_task},
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    if config.list {
        println!("{}", serde_json::to_string_pretty(&Catalog::new())?);
        return Ok(());
    }

    // Logs go to stderr so they stay out of the rendered display
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting breath-coach v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: pattern={}, session={}", config.pattern, config.session);

    let (driver, handle) = SessionDriver::new(Coach::new(config.pattern, config.session));
    let driver_task = tokio::spawn(driver.run());
    let render = tokio::spawn(render_task(handle.subscribe()));

    println!("{}", HELP.dimmed());
    println!();

    if config.start {
        handle.send(Command::PrimaryAction).map_err(anyhow::Error::msg)?;
    }

    tokio::select! {
        result = input_task(handle.clone()) => {
            if let Err(e) = result {
                error!("Input error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to install signal handlers: {}", e),
            }
        }
    }

    handle.shutdown().map_err(anyhow::Error::msg)?;
    driver_task.await?;
    render.await?;

    info!("Shutdown complete");
    Ok(())
}
