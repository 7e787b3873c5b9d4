pub mod catalog;
pub mod colony;
pub mod economy;
pub mod eligibility;
pub mod ledger;
pub mod offline;
pub mod queue;
