//! Pairwise debt ledger.
//!
//! The ledger is a dense `n × n` matrix of [`MoneyCents`] indexed by the
//! position of each member in the snapshot's member list. Cell
//! `(debtor, creditor)` holds what `debtor` owes `creditor`. The diagonal is
//! never written.
//!
//! While transactions are being applied a cell holds the **gross** obligation
//! and may go negative (a settlement larger than the debt in that direction).
//! [`PairwiseLedger::net`] then folds each unordered pair into a single
//! non-negative direction, after which at most one of `(a, b)` and `(b, a)` is
//! nonzero.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, Member, MemberId, MoneyCents, ResultEngine};

/// Stable member → matrix position assignment, computed once per invocation
/// from the member-list order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberIndex {
    ids: Vec<MemberId>,
    positions: HashMap<MemberId, usize>,
}

impl MemberIndex {
    /// Builds the index, rejecting duplicated member ids.
    pub fn new(members: &[Member]) -> ResultEngine<Self> {
        let mut ids = Vec::with_capacity(members.len());
        let mut positions = HashMap::with_capacity(members.len());
        for member in members {
            if positions.insert(member.id.clone(), ids.len()).is_some() {
                return Err(EngineError::ExistingKey(format!("member {}", member.id)));
            }
            ids.push(member.id.clone());
        }
        Ok(Self { ids, positions })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[MemberId] {
        &self.ids
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Resolves `id` or fails with a referential-integrity error naming the
    /// entity that referenced it.
    pub(crate) fn resolve(
        &self,
        id: &MemberId,
        entity: impl FnOnce() -> String,
    ) -> ResultEngine<usize> {
        self.position(id.as_str())
            .ok_or_else(|| EngineError::ReferentialIntegrity {
                entity: entity(),
                member_id: id.clone(),
            })
    }
}

/// A single netted obligation: `debtor` owes `creditor` `amount`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub debtor: MemberId,
    pub creditor: MemberId,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairwiseLedger {
    index: MemberIndex,
    cells: Vec<MoneyCents>,
}

impl PairwiseLedger {
    pub(crate) fn zeroed(index: MemberIndex) -> Self {
        let n = index.len();
        Self {
            index,
            cells: vec![MoneyCents::ZERO; n * n],
        }
    }

    fn offset(&self, debtor: usize, creditor: usize) -> usize {
        debtor * self.index.len() + creditor
    }

    pub fn index(&self) -> &MemberIndex {
        &self.index
    }

    /// Amount stored at `(debtor, creditor)` by matrix position.
    pub fn at(&self, debtor: usize, creditor: usize) -> MoneyCents {
        self.cells[self.offset(debtor, creditor)]
    }

    /// What `debtor` owes `creditor`, or `None` if either id is unknown.
    pub fn owed(&self, debtor: &str, creditor: &str) -> Option<MoneyCents> {
        let d = self.index.position(debtor)?;
        let c = self.index.position(creditor)?;
        Some(self.at(d, c))
    }

    /// Adds `amount` to `(debtor, creditor)`. `None` on overflow.
    pub(crate) fn add(
        &mut self,
        debtor: usize,
        creditor: usize,
        amount: MoneyCents,
    ) -> Option<()> {
        let offset = self.offset(debtor, creditor);
        self.cells[offset] = self.cells[offset].checked_add(amount)?;
        Some(())
    }

    /// Subtracts `amount` from `(debtor, creditor)`. `None` on overflow.
    pub(crate) fn sub(
        &mut self,
        debtor: usize,
        creditor: usize,
        amount: MoneyCents,
    ) -> Option<()> {
        let offset = self.offset(debtor, creditor);
        self.cells[offset] = self.cells[offset].checked_sub(amount)?;
        Some(())
    }

    /// Cancels reciprocal debts, visiting every unordered pair exactly once in
    /// member order. `None` on overflow.
    pub(crate) fn net(&mut self) -> Option<()> {
        let n = self.index.len();
        for a in 0..n {
            for b in (a + 1)..n {
                let ab = self.offset(a, b);
                let ba = self.offset(b, a);
                let diff = self.cells[ab].checked_sub(self.cells[ba])?;
                if diff.is_positive() {
                    self.cells[ab] = diff;
                    self.cells[ba] = MoneyCents::ZERO;
                } else if diff.is_negative() {
                    self.cells[ba] = MoneyCents::ZERO.checked_sub(diff)?;
                    self.cells[ab] = MoneyCents::ZERO;
                } else {
                    self.cells[ab] = MoneyCents::ZERO;
                    self.cells[ba] = MoneyCents::ZERO;
                }
            }
        }
        Some(())
    }

    /// Every positive cell, debtor-major in member order.
    pub fn debts(&self) -> impl Iterator<Item = Debt> + '_ {
        let ids = self.index.ids();
        ids.iter().enumerate().flat_map(move |(d, debtor)| {
            ids.iter().enumerate().filter_map(move |(c, creditor)| {
                let amount = self.at(d, c);
                amount.is_positive().then(|| Debt {
                    debtor: debtor.clone(),
                    creditor: creditor.clone(),
                    amount,
                })
            })
        })
    }

    /// `true` once every cell is zero.
    pub fn is_settled(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(ids: &[&str]) -> PairwiseLedger {
        let members: Vec<Member> = ids.iter().map(|id| Member::new(*id, *id)).collect();
        PairwiseLedger::zeroed(MemberIndex::new(&members).unwrap())
    }

    #[test]
    fn duplicate_member_is_rejected() {
        let members = vec![Member::new("a", "A"), Member::new("a", "A again")];
        assert_eq!(
            MemberIndex::new(&members),
            Err(EngineError::ExistingKey("member a".to_string()))
        );
    }

    #[test]
    fn net_keeps_larger_direction() {
        let mut ledger = ledger(&["a", "b"]);
        ledger.add(0, 1, MoneyCents::new(300)).unwrap();
        ledger.add(1, 0, MoneyCents::new(1000)).unwrap();
        ledger.net().unwrap();

        assert_eq!(ledger.owed("a", "b"), Some(MoneyCents::ZERO));
        assert_eq!(ledger.owed("b", "a"), Some(MoneyCents::new(700)));
    }

    #[test]
    fn net_flips_negative_cell() {
        // Overpaying settlement: a owed b 10, paid 15.
        let mut ledger = ledger(&["a", "b"]);
        ledger.add(0, 1, MoneyCents::new(1000)).unwrap();
        ledger.sub(0, 1, MoneyCents::new(1500)).unwrap();
        ledger.net().unwrap();

        assert_eq!(ledger.owed("a", "b"), Some(MoneyCents::ZERO));
        assert_eq!(ledger.owed("b", "a"), Some(MoneyCents::new(500)));
    }

    #[test]
    fn net_clears_equal_pair() {
        let mut ledger = ledger(&["a", "b"]);
        ledger.add(0, 1, MoneyCents::new(420)).unwrap();
        ledger.add(1, 0, MoneyCents::new(420)).unwrap();
        ledger.net().unwrap();

        assert!(ledger.is_settled());
        assert_eq!(ledger.debts().count(), 0);
    }

    #[test]
    fn debts_are_listed_in_member_order() {
        let mut ledger = ledger(&["a", "b", "c"]);
        ledger.add(2, 0, MoneyCents::new(100)).unwrap();
        ledger.add(0, 1, MoneyCents::new(200)).unwrap();
        ledger.net().unwrap();

        let debts: Vec<(String, String)> = ledger
            .debts()
            .map(|d| (d.debtor.to_string(), d.creditor.to_string()))
            .collect();
        assert_eq!(
            debts,
            vec![
                ("a".to_string(), "b".to_string()),
                ("c".to_string(), "a".to_string())
            ]
        );
    }

    #[test]
    fn unknown_member_has_no_cell() {
        let ledger = ledger(&["a", "b"]);
        assert_eq!(ledger.owed("a", "z"), None);
    }

    #[test]
    fn overflow_is_reported() {
        let mut ledger = ledger(&["a", "b"]);
        ledger.add(0, 1, MoneyCents::new(i64::MAX)).unwrap();
        assert_eq!(ledger.add(0, 1, MoneyCents::new(1)), None);
    }
}
