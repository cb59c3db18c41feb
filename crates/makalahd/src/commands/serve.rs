//! Module for the "serve" command.

use tokio::net::TcpListener;

use super::*;
use crate::server::{router, AppState};

/// Arguments that can be used for the [`Commands::Serve`]
#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
  /// Interface to bind, overriding the configured host
  #[arg(long)]
  pub host: Option<String>,

  /// Port to bind, overriding the configured port
  #[arg(long, short)]
  pub port: Option<u16>,

  /// Also write logs to a daily rolling file in this directory
  #[arg(long)]
  pub log_dir: Option<PathBuf>,
}

/// Function for the [`Commands::Serve`] in the CLI.
///
/// Refuses to start without an API key. Runs until interrupted.
pub async fn serve(config: Config, args: ServeArgs) -> Result<()> {
  let config = config.require_api_key()?;
  let host = args.host.unwrap_or_else(|| config.host.clone());
  let port = args.port.unwrap_or(config.port);

  let state = AppState::new(Generator::from_config(&config)?);
  let listener = TcpListener::bind((host.as_str(), port)).await?;
  let address = listener.local_addr()?;
  info!("Listening on {address} with model {}", config.model);
  println!("{} Listening on http://{address}", style(INFO_PREFIX).cyan());

  axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;
  println!("{} Server stopped", style(SUCCESS_PREFIX).green());
  Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
  if let Err(error) = tokio::signal::ctrl_c().await {
    tracing::warn!("Cannot listen for shutdown signal: {error}");
    std::future::pending::<()>().await;
  }
}
