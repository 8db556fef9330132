//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`ReferentialIntegrity`] thrown when an expense, split or settlement
//!   names a member that is not part of the group snapshot.
//! - [`InvalidAmount`] thrown for negative, non-finite, sub-cent or
//!   overflowing amounts.
//! - [`ExistingKey`] thrown when a member id is listed twice.
//! - [`InvalidSettlement`] thrown when a settlement (or a pair view) has the
//!   same member on both sides.
//! - [`KeyNotFound`] thrown when a view is requested for an unknown member.
//!
//!  [`ReferentialIntegrity`]: EngineError::ReferentialIntegrity
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidSettlement`]: EngineError::InvalidSettlement
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use thiserror::Error;

use crate::MemberId;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown member \"{member_id}\" referenced by {entity}")]
    ReferentialIntegrity { entity: String, member_id: MemberId },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid settlement: {0}")]
    InvalidSettlement(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
}
