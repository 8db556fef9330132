//! Balance-ledger netting engine for shared-expense groups.
//!
//! Given a [`GroupSnapshot`] (members, expenses, settlements) the engine
//! computes, for every member, a net balance and the netted list of who they
//! owe and who owes them. It is a pure computation: no I/O, no state kept
//! between calls.
//!
//! ```rust
//! use engine::{Expense, GroupSnapshot, Member, MoneyCents, Settlement};
//!
//! let snapshot = GroupSnapshot::new(vec![Member::new("a", "Alice"), Member::new("b", "Bob")])
//!     .expense(
//!         Expense::new("e1", "a", MoneyCents::new(100_00))
//!             .split("a", MoneyCents::new(50_00))
//!             .split("b", MoneyCents::new(50_00)),
//!     )
//!     .settlement(Settlement::new("s1", "b", "a", MoneyCents::new(20_00)));
//!
//! let report = snapshot.balances().unwrap();
//! assert_eq!(report.total("a"), Some(MoneyCents::new(30_00)));
//! assert_eq!(report.ledger().owed("b", "a"), Some(MoneyCents::new(30_00)));
//! ```

pub use balances::{BalanceReport, Counterpart, GroupSnapshot, LedgerBuilder, MemberBalance};
pub use error::EngineError;
pub use expenses::{Expense, Split};
pub use ledger::{Debt, MemberIndex, PairwiseLedger};
pub use members::{Member, MemberId, MemberRole};
pub use money::MoneyCents;
pub use settlements::Settlement;
pub use views::{
    BalanceStatus, CounterpartView, MemberView, PairBalance, ReminderDigest, ReminderLine,
};

mod balances;
mod error;
mod expenses;
mod ledger;
mod members;
mod money;
mod settlements;
mod views;

pub type ResultEngine<T> = Result<T, EngineError>;
