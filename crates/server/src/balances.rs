//! Group balance endpoints. Every request carries the full group snapshot.
//!
//! The `compute_*` functions are the same computations without HTTP, used by
//! the `report` command.

use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
};

use api_types::{balance::GroupBalances, group::GroupSnapshot, view};

use crate::{ServerError, convert};

type Payload = Result<Json<GroupSnapshot>, JsonRejection>;

fn body(payload: Payload) -> Result<GroupSnapshot, ServerError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!("malformed group snapshot: {rejection}");
        ServerError::Generic(rejection.body_text())
    })?;
    Ok(payload)
}

fn report(payload: GroupSnapshot) -> Result<engine::BalanceReport, ServerError> {
    Ok(convert::snapshot(payload)?.balances()?)
}

pub fn compute_group_balances(payload: GroupSnapshot) -> Result<GroupBalances, ServerError> {
    Ok(convert::balances(&report(payload)?))
}

pub fn compute_member_balance(
    payload: GroupSnapshot,
    member_id: &str,
) -> Result<view::MemberBalance, ServerError> {
    let member = report(payload)?.member_view(member_id)?;
    Ok(convert::member_balance(member))
}

pub fn compute_pair_balance(
    payload: GroupSnapshot,
    member_id: &str,
    counterpart_id: &str,
) -> Result<view::PairBalance, ServerError> {
    let pair = report(payload)?.pair_balance(member_id, counterpart_id)?;
    Ok(convert::pair_balance(pair))
}

pub fn compute_suggested_settlements(
    payload: GroupSnapshot,
) -> Result<view::SuggestedSettlements, ServerError> {
    let debts = report(payload)?.suggested_settlements();
    Ok(convert::suggested_settlements(debts))
}

pub fn compute_reminders(payload: GroupSnapshot) -> Result<view::Reminders, ServerError> {
    let digests = report(payload)?.reminders()?;
    Ok(convert::reminders(digests))
}

pub async fn group_balances(payload: Payload) -> Result<Json<GroupBalances>, ServerError> {
    compute_group_balances(body(payload)?).map(Json)
}

pub async fn member_balance(
    Path(member_id): Path<String>,
    payload: Payload,
) -> Result<Json<view::MemberBalance>, ServerError> {
    compute_member_balance(body(payload)?, &member_id).map(Json)
}

pub async fn pair_balance(
    Path((member_id, counterpart_id)): Path<(String, String)>,
    payload: Payload,
) -> Result<Json<view::PairBalance>, ServerError> {
    compute_pair_balance(body(payload)?, &member_id, &counterpart_id).map(Json)
}

pub async fn suggested_settlements(
    payload: Payload,
) -> Result<Json<view::SuggestedSettlements>, ServerError> {
    compute_suggested_settlements(body(payload)?).map(Json)
}

pub async fn reminders(payload: Payload) -> Result<Json<view::Reminders>, ServerError> {
    compute_reminders(body(payload)?).map(Json)
}
