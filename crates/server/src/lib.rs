//! HTTP surface for the balance engine.

use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;

pub use balances::{
    compute_group_balances, compute_member_balance, compute_pair_balance, compute_reminders,
    compute_suggested_settlements,
};
pub use server::{router, run, run_with_listener};

mod balances;
mod convert;
mod server;

pub mod types {
    pub mod group {
        pub use api_types::group::{Expense, GroupSnapshot, Member, Settlement, Split};
    }

    pub mod balance {
        pub use api_types::balance::{Balance, GroupBalances, OwedBy, Owes};
    }

    pub mod view {
        pub use api_types::view::{
            BalanceStatus, Counterpart, Debt, MemberAmount, MemberBalance, PairBalance, Reminder,
            Reminders, SuggestedSettlement, SuggestedSettlements,
        };
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::ReferentialIntegrity { .. }
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidSettlement(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Engine(err) => write!(f, "{err}"),
            ServerError::Generic(err) => f.write_str(err),
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                tracing::warn!("balance request rejected: {err}");
                (status_for_engine_error(&err), err.to_string())
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::MemberId;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::InvalidSettlement("x".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn referential_integrity_maps_to_422() {
        let res = ServerError::from(EngineError::ReferentialIntegrity {
            entity: "settlement s1".to_string(),
            member_id: MemberId::new("ghost"),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
