use dotenv::dotenv;

use gamestore_api::{create_routes, Config, GameStoreContext};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;

    let ctx = GameStoreContext::connect(&config.database_url).await?;
    ctx.migrate().await?;
    log::info!("database ready at {}", config.database_url);

    let app = create_routes(ctx);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    log::info!("HTTP API server listening on http://{}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("HTTP server finished");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
