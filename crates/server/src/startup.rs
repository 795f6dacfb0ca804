use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use models::user::User;
use service::{
    storage::{JsonArrayStore, UserStore},
    user_service::UserService,
};
use tracing::info;

use crate::routes;

/// Shared handler state. Holds no user data, only the way to reach it.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { users: UserService::new(store) }
    }
}

/// Prepare the data file and build the router backed by it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let data_file = &cfg.storage.data_file;
    common::env::ensure_data_file(data_file).await?;
    let store = JsonArrayStore::<User>::new(data_file);
    Ok(routes::build_router(AppState::new(Arc::new(store))))
}

/// Run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
        }
    })
    .await
}

/// Run the HTTP server until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, data_file = %cfg.storage.data_file.display(), "starting user store");
    println!("\nServer started at port: {}\n", cfg.server.port);

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
