//! Mapping between the JSON contract (`api_types`) and engine types.
//!
//! Amounts arrive as major-unit floats and are converted to cents here, so a
//! malformed amount is reported with the id of the record carrying it.

use api_types::{Amount, MemberRole, balance, group, view};
use engine::{EngineError, MoneyCents, ResultEngine};

fn amount(value: f64, entity: impl FnOnce() -> String) -> ResultEngine<MoneyCents> {
    MoneyCents::try_from_major(value).map_err(|err| match err {
        EngineError::InvalidAmount(msg) => {
            EngineError::InvalidAmount(format!("{}: {msg}", entity()))
        }
        other => other,
    })
}

fn role(role: MemberRole) -> engine::MemberRole {
    match role {
        MemberRole::Admin => engine::MemberRole::Admin,
        MemberRole::Member => engine::MemberRole::Member,
    }
}

fn api_role(role: engine::MemberRole) -> MemberRole {
    match role {
        engine::MemberRole::Admin => MemberRole::Admin,
        engine::MemberRole::Member => MemberRole::Member,
    }
}

fn api_amount(value: MoneyCents) -> Amount {
    Amount::from_minor(value.cents())
}

pub(crate) fn snapshot(payload: group::GroupSnapshot) -> ResultEngine<engine::GroupSnapshot> {
    let members = payload
        .members
        .into_iter()
        .map(|m| engine::Member {
            id: m.id.into(),
            name: m.name,
            image_url: m.image_url,
            role: role(m.role),
        })
        .collect();

    let expenses = payload
        .expenses
        .into_iter()
        .map(|e| {
            let total = amount(e.amount, || format!("expense {}", e.id))?;
            let splits = e
                .splits
                .into_iter()
                .map(|s| {
                    Ok(engine::Split {
                        member_id: s.user_id.into(),
                        amount: amount(s.amount, || format!("split of expense {}", e.id))?,
                        settled: s.settled,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()?;
            Ok(engine::Expense {
                id: e.id,
                amount: total,
                paid_by: e.paid_by_user_id.into(),
                splits,
                category: e.category,
                description: e.description,
                date: e.date,
            })
        })
        .collect::<ResultEngine<Vec<_>>>()?;

    let settlements = payload
        .settlements
        .into_iter()
        .map(|s| {
            Ok(engine::Settlement {
                amount: amount(s.amount, || format!("settlement {}", s.id))?,
                id: s.id,
                paid_by: s.paid_by_user_id.into(),
                received_by: s.received_by_user_id.into(),
                date: s.date,
                related_expense_ids: s.related_expense_ids,
            })
        })
        .collect::<ResultEngine<Vec<_>>>()?;

    Ok(engine::GroupSnapshot {
        members,
        expenses,
        settlements,
    })
}

pub(crate) fn balances(report: &engine::BalanceReport) -> balance::GroupBalances {
    let balances = report
        .balances()
        .iter()
        .map(|b| balance::Balance {
            member_id: b.member.id.to_string(),
            name: b.member.name.clone(),
            image_url: b.member.image_url.clone(),
            role: api_role(b.member.role),
            total_balance: api_amount(b.total_balance),
            owes: b
                .owes
                .iter()
                .map(|c| balance::Owes {
                    to: c.member_id.to_string(),
                    amount: api_amount(c.amount),
                })
                .collect(),
            owed_by: b
                .owed_by
                .iter()
                .map(|c| balance::OwedBy {
                    from: c.member_id.to_string(),
                    amount: api_amount(c.amount),
                })
                .collect(),
        })
        .collect();

    balance::GroupBalances { balances }
}

fn member_amount(view: &engine::CounterpartView) -> view::MemberAmount {
    view::MemberAmount {
        user_id: view.member.id.to_string(),
        name: view.member.name.clone(),
        image_url: view.member.image_url.clone(),
        amount: api_amount(view.amount),
    }
}

pub(crate) fn member_balance(member: engine::MemberView) -> view::MemberBalance {
    view::MemberBalance {
        member_id: member.member.id.to_string(),
        name: member.member.name,
        image_url: member.member.image_url,
        role: api_role(member.member.role),
        total_balance: api_amount(member.total_balance),
        you_owe: api_amount(member.you_owe),
        you_are_owed: api_amount(member.you_are_owed),
        status: match member.status {
            engine::BalanceStatus::Owed => view::BalanceStatus::Owed,
            engine::BalanceStatus::Owes => view::BalanceStatus::Owes,
            engine::BalanceStatus::SettledUp => view::BalanceStatus::SettledUp,
        },
        all_settled_up: member.all_settled_up,
        owes: member.owes.iter().map(member_amount).collect(),
        owed_by: member.owed_by.iter().map(member_amount).collect(),
    }
}

pub(crate) fn pair_balance(pair: engine::PairBalance) -> view::PairBalance {
    view::PairBalance {
        counterpart: view::Counterpart {
            user_id: pair.counterpart.id.to_string(),
            name: pair.counterpart.name,
            image_url: pair.counterpart.image_url,
        },
        you_are_owed: api_amount(pair.you_are_owed),
        you_owe: api_amount(pair.you_owe),
        net_balance: api_amount(pair.net_balance),
    }
}

pub(crate) fn suggested_settlements(debts: Vec<engine::Debt>) -> view::SuggestedSettlements {
    view::SuggestedSettlements {
        settlements: debts
            .into_iter()
            .map(|debt| view::SuggestedSettlement {
                from: debt.debtor.to_string(),
                to: debt.creditor.to_string(),
                amount: api_amount(debt.amount),
            })
            .collect(),
    }
}

pub(crate) fn reminders(digests: Vec<engine::ReminderDigest>) -> view::Reminders {
    view::Reminders {
        reminders: digests
            .into_iter()
            .map(|digest| view::Reminder {
                user_id: digest.member.id.to_string(),
                name: digest.member.name,
                total: api_amount(digest.total),
                debts: digest
                    .debts
                    .into_iter()
                    .map(|line| view::Debt {
                        name: line.name,
                        amount: api_amount(line.amount),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(split_amount: f64) -> group::GroupSnapshot {
        serde_json::from_value(serde_json::json!({
            "members": [
                {"id": "a", "name": "Alice", "role": "admin"},
                {"id": "b", "name": "Bob", "role": "member"}
            ],
            "expenses": [{
                "id": "e1",
                "amount": 10.0,
                "paidByUserId": "a",
                "splits": [{"userId": "b", "amount": split_amount, "settled": false}]
            }],
            "settlements": []
        }))
        .unwrap()
    }

    #[test]
    fn amounts_become_cents() {
        let snapshot = snapshot(payload(9.99)).unwrap();
        assert_eq!(snapshot.expenses[0].amount, MoneyCents::new(1000));
        assert_eq!(snapshot.expenses[0].splits[0].amount, MoneyCents::new(999));
        assert_eq!(snapshot.members[0].role, engine::MemberRole::Admin);
    }

    #[test]
    fn sub_cent_amount_names_the_record() {
        let err = snapshot(payload(1.234)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidAmount(msg) if msg.starts_with("split of expense e1")
        ));
    }
}
