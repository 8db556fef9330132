//! Shared expenses and their per-member splits.
//!
//! An [`Expense`] records one payment made by a member on behalf of the group.
//! Each [`Split`] is one member's share of it. The engine trusts upstream for
//! `sum(splits) == amount` and never re-derives shares.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MemberId, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub member_id: MemberId,
    pub amount: MoneyCents,
    /// The share was already paid back outside the settlement flow.
    pub settled: bool,
}

impl Split {
    pub fn new(member_id: impl Into<MemberId>, amount: MoneyCents) -> Self {
        Self {
            member_id: member_id.into(),
            amount,
            settled: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: MoneyCents,
    pub paid_by: MemberId,
    pub splits: Vec<Split>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(id: impl Into<String>, paid_by: impl Into<MemberId>, amount: MoneyCents) -> Self {
        Self {
            id: id.into(),
            amount,
            paid_by: paid_by.into(),
            splits: Vec::new(),
            category: None,
            description: None,
            date: None,
        }
    }

    /// Appends an unsettled share.
    #[must_use]
    pub fn split(mut self, member_id: impl Into<MemberId>, amount: MoneyCents) -> Self {
        self.splits.push(Split::new(member_id, amount));
        self
    }

    /// Appends a share already reconciled outside the settlement flow.
    #[must_use]
    pub fn settled_split(mut self, member_id: impl Into<MemberId>, amount: MoneyCents) -> Self {
        let mut split = Split::new(member_id, amount);
        split.settled = true;
        self.splits.push(split);
        self
    }

    /// Splits that create a debt towards the payer: not the payer's own share
    /// and not already settled.
    pub fn liabilities(&self) -> impl Iterator<Item = &Split> + '_ {
        self.splits
            .iter()
            .filter(move |split| split.member_id != self.paid_by && !split.settled)
    }
}
