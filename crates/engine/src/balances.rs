//! Ledger builder and balance report.
//!
//! [`LedgerBuilder`] replays a group's expenses and settlements into per-member
//! totals and a gross [`PairwiseLedger`], then nets it. Gross obligations are
//! accumulated first and netted once at the end, so the result does not depend
//! on the order transactions are applied in.
//!
//! Invariants of every [`BalanceReport`]:
//! - the member totals sum to exactly zero;
//! - for any pair of members at most one direction of the ledger is nonzero.

use serde::{Deserialize, Serialize};

use crate::{
    Debt, EngineError, Expense, Member, MemberId, MemberIndex, MoneyCents, PairwiseLedger,
    ResultEngine, Settlement,
};

/// Everything the engine needs about one group, as of one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}

impl GroupSnapshot {
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }

    #[must_use]
    pub fn settlement(mut self, settlement: Settlement) -> Self {
        self.settlements.push(settlement);
        self
    }

    /// Computes the netted balance report of the group.
    pub fn balances(&self) -> ResultEngine<BalanceReport> {
        let mut builder = LedgerBuilder::new(&self.members)?;
        for expense in &self.expenses {
            builder.apply_expense(expense)?;
        }
        for settlement in &self.settlements {
            builder.apply_settlement(settlement)?;
        }
        let report = builder.finish()?;

        tracing::debug!(
            members = self.members.len(),
            expenses = self.expenses.len(),
            settlements = self.settlements.len(),
            debts = report.ledger().debts().count(),
            "computed group balances"
        );
        Ok(report)
    }
}

/// One side of a member's balance: the other member and the netted amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterpart {
    pub member_id: MemberId,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: Member,
    /// Positive = is owed overall, negative = owes overall.
    pub total_balance: MoneyCents,
    /// Members this member owes, in member order.
    pub owes: Vec<Counterpart>,
    /// Members owing this member, in member order.
    pub owed_by: Vec<Counterpart>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceReport {
    balances: Vec<MemberBalance>,
    ledger: PairwiseLedger,
}

impl BalanceReport {
    /// Per-member balances, in member order.
    pub fn balances(&self) -> &[MemberBalance] {
        &self.balances
    }

    /// The netted pairwise ledger the balances were derived from.
    pub fn ledger(&self) -> &PairwiseLedger {
        &self.ledger
    }

    pub fn get(&self, member_id: &str) -> Option<&MemberBalance> {
        self.ledger
            .index()
            .position(member_id)
            .map(|position| &self.balances[position])
    }

    pub(crate) fn require(&self, member_id: &str) -> ResultEngine<&MemberBalance> {
        self.get(member_id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("member {member_id}")))
    }

    /// Net total of member `member_id`, if present.
    pub fn total(&self, member_id: &str) -> Option<MoneyCents> {
        self.get(member_id).map(|balance| balance.total_balance)
    }

    /// Sum of all member totals. Zero for a report built by the engine; the
    /// running sum may still overflow on the way there.
    pub fn sum_of_totals(&self) -> ResultEngine<MoneyCents> {
        MoneyCents::checked_sum(self.balances.iter().map(|b| b.total_balance))
            .ok_or_else(|| overflow("member totals"))
    }

    /// Payments that would settle the whole group, one per nonzero ledger
    /// cell, debtor-major in member order.
    pub fn suggested_settlements(&self) -> Vec<Debt> {
        self.ledger.debts().collect()
    }

    /// `true` if nobody owes anybody.
    pub fn is_settled(&self) -> bool {
        self.ledger.is_settled()
    }
}

/// Accumulates expenses and settlements for one group.
///
/// Each `apply_*` call validates the whole record before touching any state,
/// so a rejected record leaves the builder unchanged. Arithmetic overflow is
/// the one failure detected mid-record; drop the builder after it.
#[derive(Debug)]
pub struct LedgerBuilder<'a> {
    members: &'a [Member],
    totals: Vec<MoneyCents>,
    ledger: PairwiseLedger,
}

impl<'a> LedgerBuilder<'a> {
    pub fn new(members: &'a [Member]) -> ResultEngine<Self> {
        let index = MemberIndex::new(members)?;
        Ok(Self {
            members,
            totals: vec![MoneyCents::ZERO; index.len()],
            ledger: PairwiseLedger::zeroed(index),
        })
    }

    pub fn apply_expense(&mut self, expense: &Expense) -> ResultEngine<()> {
        let entity = || format!("expense {}", expense.id);
        ensure_non_negative(expense.amount, entity)?;
        let payer = self.ledger.index().resolve(&expense.paid_by, entity)?;

        let split_entity = || format!("split of expense {}", expense.id);
        let mut liabilities = Vec::with_capacity(expense.splits.len());
        for split in &expense.splits {
            ensure_non_negative(split.amount, split_entity)?;
            self.ledger.index().resolve(&split.member_id, split_entity)?;
        }
        for split in expense.liabilities() {
            let debtor = self.ledger.index().resolve(&split.member_id, split_entity)?;
            liabilities.push((debtor, split.amount));
        }

        for (debtor, amount) in liabilities {
            apply_transfer(&mut self.totals, payer, debtor, amount)
                .and_then(|()| self.ledger.add(debtor, payer, amount))
                .ok_or_else(|| overflow(&entity()))?;
        }
        Ok(())
    }

    pub fn apply_settlement(&mut self, settlement: &Settlement) -> ResultEngine<()> {
        let entity = || format!("settlement {}", settlement.id);
        ensure_non_negative(settlement.amount, entity)?;
        let index = self.ledger.index();
        let payer = index.resolve(&settlement.paid_by, entity)?;
        let receiver = index.resolve(&settlement.received_by, entity)?;
        if payer == receiver {
            return Err(EngineError::InvalidSettlement(format!(
                "{}: payer and receiver are both {}",
                entity(),
                settlement.paid_by
            )));
        }

        apply_transfer(&mut self.totals, payer, receiver, settlement.amount)
            .and_then(|()| self.ledger.sub(payer, receiver, settlement.amount))
            .ok_or_else(|| overflow(&entity()))?;
        Ok(())
    }

    /// Nets the ledger and shapes the per-member report.
    pub fn finish(mut self) -> ResultEngine<BalanceReport> {
        self.ledger
            .net()
            .ok_or_else(|| overflow("ledger netting"))?;

        let n = self.members.len();
        let ids = self.ledger.index().ids();
        let balances = self
            .members
            .iter()
            .enumerate()
            .map(|(m, member)| {
                let owes = (0..n)
                    .filter(|&x| x != m && self.ledger.at(m, x).is_positive())
                    .map(|x| Counterpart {
                        member_id: ids[x].clone(),
                        amount: self.ledger.at(m, x),
                    })
                    .collect();
                let owed_by = (0..n)
                    .filter(|&y| y != m && self.ledger.at(y, m).is_positive())
                    .map(|y| Counterpart {
                        member_id: ids[y].clone(),
                        amount: self.ledger.at(y, m),
                    })
                    .collect();
                MemberBalance {
                    member: member.clone(),
                    total_balance: self.totals[m],
                    owes,
                    owed_by,
                }
            })
            .collect();

        Ok(BalanceReport {
            balances,
            ledger: self.ledger,
        })
    }
}

/// Moves `amount` of net balance from `debtor` to `creditor`.
fn apply_transfer(
    totals: &mut [MoneyCents],
    creditor: usize,
    debtor: usize,
    amount: MoneyCents,
) -> Option<()> {
    totals[creditor] = totals[creditor].checked_add(amount)?;
    totals[debtor] = totals[debtor].checked_sub(amount)?;
    Some(())
}

fn ensure_non_negative(amount: MoneyCents, entity: impl FnOnce() -> String) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "{}: amount must be >= 0, got {amount}",
            entity()
        )));
    }
    Ok(())
}

pub(crate) fn overflow(entity: &str) -> EngineError {
    EngineError::InvalidAmount(format!("{entity}: amount overflow"))
}
