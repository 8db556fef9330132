use engine::{Expense, GroupSnapshot, Member, MoneyCents, Settlement};
use proptest::prelude::*;

const MEMBERS: [&str; 4] = ["a", "b", "c", "d"];

fn member_id() -> impl Strategy<Value = &'static str> {
    prop::sample::select(MEMBERS.to_vec())
}

fn amount() -> impl Strategy<Value = MoneyCents> {
    (0i64..100_000).prop_map(MoneyCents::new)
}

fn split() -> impl Strategy<Value = (&'static str, MoneyCents, bool)> {
    (member_id(), amount(), any::<bool>())
}

fn expense() -> impl Strategy<Value = Expense> {
    (member_id(), prop::collection::vec(split(), 0..5)).prop_map(|(payer, splits)| {
        let total = splits.iter().map(|(_, amount, _)| amount.cents()).sum();
        let mut expense = Expense::new("e", payer, MoneyCents::new(total));
        for (member, amount, settled) in splits {
            expense = if settled {
                expense.settled_split(member, amount)
            } else {
                expense.split(member, amount)
            };
        }
        expense
    })
}

fn settlement() -> impl Strategy<Value = Settlement> {
    (member_id(), member_id(), amount())
        .prop_filter("payer must differ from receiver", |(p, r, _)| p != r)
        .prop_map(|(payer, receiver, amount)| Settlement::new("s", payer, receiver, amount))
}

fn snapshot() -> impl Strategy<Value = GroupSnapshot> {
    (
        prop::collection::vec(expense(), 0..12),
        prop::collection::vec(settlement(), 0..8),
    )
        .prop_map(|(expenses, settlements)| GroupSnapshot {
            members: MEMBERS.iter().map(|id| Member::new(*id, *id)).collect(),
            expenses,
            settlements,
        })
}

proptest! {
    #[test]
    fn totals_always_sum_to_zero(snapshot in snapshot()) {
        let report = snapshot.balances().unwrap();
        prop_assert_eq!(report.sum_of_totals().unwrap(), MoneyCents::ZERO);
    }

    #[test]
    fn at_most_one_direction_per_pair(snapshot in snapshot()) {
        let report = snapshot.balances().unwrap();
        let ledger = report.ledger();
        for a in MEMBERS {
            for b in MEMBERS {
                let ab = ledger.owed(a, b).unwrap();
                let ba = ledger.owed(b, a).unwrap();
                prop_assert!(!ab.is_negative());
                if ab.is_positive() {
                    prop_assert!(ba.is_zero());
                }
            }
        }
    }

    #[test]
    fn member_totals_match_ledger(snapshot in snapshot()) {
        let report = snapshot.balances().unwrap();
        for balance in report.balances() {
            let owed_by: i64 = balance.owed_by.iter().map(|c| c.amount.cents()).sum();
            let owes: i64 = balance.owes.iter().map(|c| c.amount.cents()).sum();
            prop_assert_eq!(balance.total_balance.cents(), owed_by - owes);
        }
    }

    #[test]
    fn order_does_not_matter(snapshot in snapshot(), seed in any::<u64>()) {
        let mut shuffled = snapshot.clone();
        shuffled.expenses.reverse();
        shuffled.settlements.reverse();
        if !shuffled.expenses.is_empty() {
            let k = (seed as usize) % shuffled.expenses.len();
            shuffled.expenses.rotate_left(k);
        }
        if !shuffled.settlements.is_empty() {
            let k = (seed as usize) % shuffled.settlements.len();
            shuffled.settlements.rotate_left(k);
        }

        let original = snapshot.balances().unwrap();
        let permuted = shuffled.balances().unwrap();
        prop_assert_eq!(original, permuted);
    }

    #[test]
    fn payer_split_never_counts(snapshot in snapshot(), extra in amount()) {
        let mut with_payer_share = snapshot.clone();
        for expense in &mut with_payer_share.expenses {
            let payer = expense.paid_by.clone();
            *expense = expense.clone().split(payer, extra);
        }

        prop_assert_eq!(snapshot.balances().unwrap(), with_payer_share.balances().unwrap());
    }

    #[test]
    fn settled_split_never_counts(snapshot in snapshot(), debtor in member_id(), extra in amount()) {
        let mut with_settled = snapshot.clone();
        for expense in &mut with_settled.expenses {
            *expense = expense.clone().settled_split(debtor, extra);
        }

        prop_assert_eq!(snapshot.balances().unwrap(), with_settled.balances().unwrap());
    }

    #[test]
    fn suggested_settlements_zero_everything(snapshot in snapshot()) {
        let report = snapshot.balances().unwrap();
        let mut settled = snapshot.clone();
        for debt in report.suggested_settlements() {
            settled.settlements.push(Settlement::new("auto", debt.debtor, debt.creditor, debt.amount));
        }
        let after = settled.balances().unwrap();
        prop_assert!(after.is_settled());
        for balance in after.balances() {
            prop_assert!(balance.total_balance.is_zero());
        }
    }
}
