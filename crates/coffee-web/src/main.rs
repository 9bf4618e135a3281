#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use clap::Parser;
    use coffee_web::config::Config;
    use coffee_web::db::Store;
    use coffee_web::routes::{self, AppState};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let store = Store::open(&config.database_url).await?;
    let app = routes::router(AppState { store }, &config.pkg_dir());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    log::info!("[server] listening on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("[server] failed to listen for shutdown signal: {}", e);
            }
        })
        .await
        .context("Server error")?;

    log::info!("[server] shut down");
    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // Server-only binary; the client entry point is the wasm library
}
