use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use serde_json::value::RawValue;

/// Money amount emitted by the server.
///
/// Held as integer minor units and serialized as a JSON number with exactly
/// two fractional digits (`50` → `50.00`, `-0.5` → `-0.50`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

/// `0.1 * 100.0` is not exactly `10.0`.
const SUB_CENT_TOLERANCE: f64 = 1e-6;

impl Amount {
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.to_string()).map_err(ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(de::Error::custom(format!("amount is not finite: {value}")));
        }

        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > SUB_CENT_TOLERANCE {
            return Err(de::Error::custom(format!("too many decimals: {value}")));
        }
        if rounded >= i64::MAX as f64 || rounded < i64::MIN as f64 {
            return Err(de::Error::custom(format!("amount too large: {value}")));
        }
        Ok(Self(rounded as i64))
    }
}

/// Role of a user inside a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
}

pub mod group {
    use super::*;

    /// A group as supplied by the storage collaborator.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct GroupSnapshot {
        pub members: Vec<Member>,
        #[serde(default)]
        pub expenses: Vec<Expense>,
        #[serde(default)]
        pub settlements: Vec<Settlement>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Member {
        pub id: String,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub image_url: Option<String>,
        #[serde(default)]
        pub role: MemberRole,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Split {
        pub user_id: String,
        /// Major units (e.g. `12.5`), at most two decimals.
        pub amount: f64,
        /// Already paid back outside the settlement flow.
        #[serde(default, alias = "paid")]
        pub settled: bool,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Expense {
        pub id: String,
        /// Major units (e.g. `12.5`), at most two decimals.
        pub amount: f64,
        pub paid_by_user_id: String,
        #[serde(default)]
        pub splits: Vec<Split>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        /// Epoch milliseconds.
        #[serde(
            default,
            with = "chrono::serde::ts_milliseconds_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub date: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Settlement {
        pub id: String,
        /// Major units (e.g. `12.5`), at most two decimals.
        pub amount: f64,
        pub paid_by_user_id: String,
        pub received_by_user_id: String,
        /// Epoch milliseconds.
        #[serde(
            default,
            with = "chrono::serde::ts_milliseconds_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub date: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub related_expense_ids: Vec<String>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct GroupBalances {
        pub balances: Vec<Balance>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Balance {
        pub member_id: String,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub image_url: Option<String>,
        pub role: MemberRole,
        pub total_balance: Amount,
        pub owes: Vec<Owes>,
        pub owed_by: Vec<OwedBy>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Owes {
        pub to: String,
        pub amount: Amount,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct OwedBy {
        pub from: String,
        pub amount: Amount,
    }
}

pub mod view {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BalanceStatus {
        Owed,
        Owes,
        SettledUp,
    }

    /// Another member together with an amount, as shown on a balance card.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MemberAmount {
        pub user_id: String,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub image_url: Option<String>,
        pub amount: Amount,
    }

    /// One member's balance card; `owes`/`owedBy` are sorted largest first.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MemberBalance {
        pub member_id: String,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub image_url: Option<String>,
        pub role: MemberRole,
        pub total_balance: Amount,
        pub you_owe: Amount,
        pub you_are_owed: Amount,
        pub status: BalanceStatus,
        pub all_settled_up: bool,
        pub owes: Vec<MemberAmount>,
        pub owed_by: Vec<MemberAmount>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Counterpart {
        pub user_id: String,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub image_url: Option<String>,
    }

    /// Balance between the requesting member and one counterpart.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PairBalance {
        pub counterpart: Counterpart,
        pub you_are_owed: Amount,
        pub you_owe: Amount,
        pub net_balance: Amount,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SuggestedSettlement {
        pub from: String,
        pub to: String,
        pub amount: Amount,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SuggestedSettlements {
        pub settlements: Vec<SuggestedSettlement>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Debt {
        pub name: String,
        pub amount: Amount,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Reminder {
        pub user_id: String,
        pub name: String,
        pub total: Amount,
        pub debts: Vec<Debt>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Reminders {
        pub reminders: Vec<Reminder>,
    }
}
