mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env();
    let port = config.port;

    tokio::fs::create_dir_all(&config.public_dir)
        .await
        .expect("failed to create public dir");
    tokio::fs::create_dir_all(&config.upload_temp_dir)
        .await
        .expect("failed to create upload temp dir");

    tracing::info!(
        public_dir = %config.public_dir.display(),
        upload_temp_dir = %config.upload_temp_dir.display(),
        upload_max_bytes = config.upload_max_bytes,
        "configuration loaded"
    );

    let state = state::AppState::new(config);
    tracing::info!(index = %state.accounts.path().display(), "account index");
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "turntable listening");
    axum::serve(listener, app).await.expect("server failed");
}
