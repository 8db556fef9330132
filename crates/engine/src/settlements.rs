//! Direct payments between two members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MemberId, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: String,
    pub amount: MoneyCents,
    pub paid_by: MemberId,
    pub received_by: MemberId,
    pub date: Option<DateTime<Utc>>,
    /// Expenses the payment refers to. Informational only, never used in the
    /// arithmetic.
    pub related_expense_ids: Vec<String>,
}

impl Settlement {
    pub fn new(
        id: impl Into<String>,
        paid_by: impl Into<MemberId>,
        received_by: impl Into<MemberId>,
        amount: MoneyCents,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            paid_by: paid_by.into(),
            received_by: received_by.into(),
            date: None,
            related_expense_ids: Vec::new(),
        }
    }
}
