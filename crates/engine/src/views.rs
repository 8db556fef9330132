//! Per-member projections of a [`BalanceReport`].
//!
//! These are what the UI and reminder collaborators consume: a member's own
//! balance card, the balance between two specific members, and the list of
//! members who still owe money.

use serde::{Deserialize, Serialize};

use crate::{
    BalanceReport, Counterpart, EngineError, Member, MoneyCents, ResultEngine, balances::overflow,
};

/// Sign of a member's net total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Owed,
    Owes,
    SettledUp,
}

impl From<MoneyCents> for BalanceStatus {
    fn from(total: MoneyCents) -> Self {
        if total.is_positive() {
            Self::Owed
        } else if total.is_negative() {
            Self::Owes
        } else {
            Self::SettledUp
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartView {
    pub member: Member,
    pub amount: MoneyCents,
}

/// A member's own balance card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub member: Member,
    pub total_balance: MoneyCents,
    pub you_owe: MoneyCents,
    pub you_are_owed: MoneyCents,
    /// Largest debt first.
    pub owes: Vec<CounterpartView>,
    /// Largest credit first.
    pub owed_by: Vec<CounterpartView>,
    pub status: BalanceStatus,
    pub all_settled_up: bool,
}

/// Balance between one member and a single counterpart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairBalance {
    pub member: Member,
    pub counterpart: Member,
    pub you_owe: MoneyCents,
    pub you_are_owed: MoneyCents,
    /// `you_are_owed - you_owe`.
    pub net_balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderLine {
    pub name: String,
    pub amount: MoneyCents,
}

/// Outstanding debts of one member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDigest {
    pub member: Member,
    pub total: MoneyCents,
    pub debts: Vec<ReminderLine>,
}

impl BalanceReport {
    pub fn member_view(&self, member_id: &str) -> ResultEngine<MemberView> {
        let balance = self.require(member_id)?;

        let owes = self.enrich(&balance.owes)?;
        let owed_by = self.enrich(&balance.owed_by)?;
        let entity = || format!("member {member_id}");
        let you_owe = MoneyCents::checked_sum(owes.iter().map(|c| c.amount))
            .ok_or_else(|| overflow(&entity()))?;
        let you_are_owed = MoneyCents::checked_sum(owed_by.iter().map(|c| c.amount))
            .ok_or_else(|| overflow(&entity()))?;
        let all_settled_up =
            balance.total_balance.is_zero() && owes.is_empty() && owed_by.is_empty();

        Ok(MemberView {
            member: balance.member.clone(),
            total_balance: balance.total_balance,
            you_owe,
            you_are_owed,
            owes,
            owed_by,
            status: BalanceStatus::from(balance.total_balance),
            all_settled_up,
        })
    }

    pub fn pair_balance(
        &self,
        member_id: &str,
        counterpart_id: &str,
    ) -> ResultEngine<PairBalance> {
        if member_id == counterpart_id {
            return Err(EngineError::InvalidSettlement(format!(
                "cannot settle member {member_id} with themselves"
            )));
        }
        let member = self.require(member_id)?;
        let counterpart = self.require(counterpart_id)?;

        let ledger = self.ledger();
        let you_owe = ledger
            .owed(member_id, counterpart_id)
            .unwrap_or(MoneyCents::ZERO);
        let you_are_owed = ledger
            .owed(counterpart_id, member_id)
            .unwrap_or(MoneyCents::ZERO);

        let net_balance = you_are_owed
            .checked_sub(you_owe)
            .ok_or_else(|| overflow(&format!("member {member_id}")))?;

        Ok(PairBalance {
            member: member.member.clone(),
            counterpart: counterpart.member.clone(),
            you_owe,
            you_are_owed,
            net_balance,
        })
    }

    /// Members that owe money, in member order, with their debts by
    /// counterpart name.
    pub fn reminders(&self) -> ResultEngine<Vec<ReminderDigest>> {
        self.balances()
            .iter()
            .filter(|balance| !balance.owes.is_empty())
            .map(|balance| -> ResultEngine<ReminderDigest> {
                let debts: Vec<ReminderLine> = balance
                    .owes
                    .iter()
                    .filter_map(|c| {
                        self.get(c.member_id.as_str()).map(|to| ReminderLine {
                            name: to.member.name.clone(),
                            amount: c.amount,
                        })
                    })
                    .collect();
                let total = MoneyCents::checked_sum(debts.iter().map(|d| d.amount))
                    .ok_or_else(|| overflow(&format!("member {}", balance.member.id)))?;
                Ok(ReminderDigest {
                    member: balance.member.clone(),
                    total,
                    debts,
                })
            })
            .collect()
    }

    fn enrich(&self, counterparts: &[Counterpart]) -> ResultEngine<Vec<CounterpartView>> {
        let mut views = counterparts
            .iter()
            .map(|c| {
                self.require(c.member_id.as_str()).map(|other| CounterpartView {
                    member: other.member.clone(),
                    amount: c.amount,
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        views.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(views)
    }
}
