use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fencequote_web::{config::load_app_config, routes::build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config()?;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!(?config, "starting fencequote-web");
    if config.google_maps_api_key.is_none() {
        info!("GOOGLE_MAPS_API_KEY not set; delivery distances use the suburb fallback unless a host cookie supplies a key");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::from_config(config).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("listening on {}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
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
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("received shutdown signal, starting graceful shutdown");
}
