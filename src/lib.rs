pub mod cli;
pub mod config;
pub mod convert;
pub mod http;
pub mod llm;
pub mod logging;
pub mod server;

use anyhow::{Result, anyhow};
use cli::CliArgs;
use config::AppConfig;
use convert::{CompletionSettings, Converter};
use http::client::HttpClient;
use http::redact::HttpDebugConfig;
use llm::openrouter::OpenRouterProvider;
use server::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub async fn run(args: CliArgs) -> Result<()> {
    let mut config = AppConfig::load_with_path(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let converter = build_converter(&config, HttpDebugConfig::from_verbose(args.verbose))?;
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|err| anyhow!("Failed to bind {}: {err}", config.bind))?;
    info!(
        addr = %listener.local_addr()?,
        model = %config.model,
        "listening"
    );

    server::serve(listener, AppState::new(converter), shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

/// Builds the converter from resolved config. A missing credential is
/// not fatal: the page still serves and conversions report the error.
pub fn build_converter(
    config: &AppConfig,
    debug: HttpDebugConfig,
) -> Result<Converter<OpenRouterProvider>> {
    let http = HttpClient::with_timeout(config.request_timeout, debug)
        .map_err(|err| anyhow!("Failed to build HTTP client: {err}"))?;
    let provider = match OpenRouterProvider::new(
        http,
        config.openrouter_api_key.clone(),
        config.model.clone(),
        config.base_url.clone(),
    ) {
        Ok(provider) => Some(provider),
        Err(err) => {
            warn!(error = %err, "completion provider unavailable");
            None
        }
    };

    Ok(Converter::new(
        provider,
        CompletionSettings {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        },
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
