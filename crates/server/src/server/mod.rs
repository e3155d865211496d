mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use scavenger_core::Scavenger;
use tokio::sync::Mutex;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;

/// Shared by every handler
pub struct AppState {
    pub scavenger: Mutex<Scavenger>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(scavenger: Scavenger, admin_token: Option<String>) -> Self {
        Self {
            scavenger: Mutex::new(scavenger),
            admin_token,
        }
    }
}

/// Serve until ctrl-c
pub async fn run(state: AppState, bind: SocketAddr) -> std::io::Result<()> {
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
}
