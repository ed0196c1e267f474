//! Paylink Checker Entry Point

use std::process::ExitCode;

use clap::Parser;
use paylink_checker::cli::{self, Cli, Commands};
use paylink_checker::{config, logging};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let parsed = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // `_log_guard`がドロップされるまでファイルへの書き込みは完了しない
    match execute(parsed).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// サブコマンドを実行する。`check`で異常なら`Ok(false)`
async fn execute(parsed: Cli) -> anyhow::Result<bool> {
    let config = config::load_from_env()?;

    match parsed.command {
        Some(Commands::Check(args)) => Ok(cli::check::execute(&args, &config).await?),
        command => {
            let args = match command {
                Some(Commands::Run(args)) => args,
                _ => cli::run::RunArgs::default(),
            };

            info!("Paylink checker v{}", env!("CARGO_PKG_VERSION"));
            let cancel = CancellationToken::new();
            tokio::spawn(shutdown_signal(cancel.clone()));

            cli::run::execute(&args, &config, cancel).await?;
            Ok(true)
        }
    }
}

/// シャットダウンシグナルを待機
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
    cancel.cancel();
}
