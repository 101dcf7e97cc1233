use catalog::{Application, Config, config::Args, telemetry};
use clap::Parser;
use tokio::signal;

/// Resolves on SIGTERM. Never resolves where that signal doesn't exist or can't be watched.
async fn terminate() {
    #[cfg(unix)]
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
            return;
        }
        Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
    }

    std::future::pending::<()>().await
}

/// Resolves on Ctrl+C. Never resolves if the handler can't be installed.
async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await
    }
}

async fn shutdown_signal() {
    let received = tokio::select! {
        _ = interrupt() => "Ctrl+C",
        _ = terminate() => "SIGTERM",
    };
    tracing::info!("Received {}, finishing in-flight requests", received);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args)?;

    if args.validate {
        println!("Configuration in {} is valid: {}", args.config, config.summary());
        return Ok(());
    }

    telemetry::init_telemetry(config.enable_otel_export)?;
    tracing::info!("Starting catalog: {}", config.summary());

    Application::new(config).await?.serve(shutdown_signal()).await
}
