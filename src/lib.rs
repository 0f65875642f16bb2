use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};

use app::AppState;
use config::AppConfig;
use database::AppDatabase;
use dotenvy::dotenv;
use jobs::spawn_all_jobs;
use push::FcmClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod app;
pub mod config;
pub mod constants;
pub mod database;
pub mod handlers;
pub mod jobs;
pub mod models;
pub mod notification;
pub mod push;
pub mod store;
pub mod swagger;
pub mod utils;

pub async fn start_web_server() -> anyhow::Result<()> {
    // import .env file
    dotenv().ok();
    initialize_logging();
    let config = AppConfig::from_env()?;
    // create database client
    let db_client = AppDatabase::new(&config)
        .await
        .context("Unable to acquire database client")?;
    let db_client = Arc::new(db_client);
    let gateway = Arc::new(FcmClient::new(&config.fcm));
    let state = AppState::new(db_client.clone(), gateway, config.sweep_timeout);
    let state = Arc::new(state);
    spawn_all_jobs(&config, db_client, state.clone());
    start_server(config.port, state).await
}

fn initialize_logging() {
    // create default env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or("appointment_notifier=debug,tower_http=debug".into());

    // initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

async fn start_server(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    // build the socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    // create the app instance
    let app = app::build_app(state);
    tracing::debug!("Starting the app in: {addr}");
    // start serving the app in the socket address
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
