use axum::middleware;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapfeed::{app, build_state, config::Config, utils};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "snapfeed=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Snapfeed service...");

    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    let state = build_state(config).await?;
    info!("Database connection established successfully");

    let app = app(state.clone())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            utils::middleware::rate_limit_middleware,
        ))
        .layer(middleware::from_fn(
            utils::middleware::request_logging_middleware,
        ));

    let addr = format!("{}:{}", state.config.server_host, state.config.server_port);
    info!("Starting server on http://{}", addr);

    axum::Server::bind(&addr.parse()?)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
