use std::net::SocketAddr;

use axum::{Router, routing::post};
use tokio::net::TcpListener;

use crate::balances;

pub fn router() -> Router {
    Router::new()
        .route("/groups/balances", post(balances::group_balances))
        .route("/groups/balances/{member_id}", post(balances::member_balance))
        .route(
            "/groups/balances/{member_id}/with/{counterpart_id}",
            post(balances::pair_balance),
        )
        .route(
            "/groups/settlements/suggested",
            post(balances::suggested_settlements),
        )
        .route("/groups/reminders", post(balances::reminders))
}

pub async fn run(bind: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(bind).await.inspect_err(|err| {
        tracing::error!("failed to bind server listener on {bind}: {err}");
    })?;
    run_with_listener(listener).await
}

pub async fn run_with_listener(listener: TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router()).await
}
