//! Shared domain types.

pub mod money;

pub use money::{PAISA, round_money, within_paisa};
