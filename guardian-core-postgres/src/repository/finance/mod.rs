//! Read-only access to the fee ledger owned by the finance module.
//!
//! These repositories read through the pool instead of a session: summaries
//! tolerate reading slightly ahead of an uncommitted edge change.

pub mod fee_repository;
pub mod payment_repository;
pub mod term_repository;

#[cfg(test)]
pub mod test_utils;

pub use fee_repository::FeeRepositoryImpl;
pub use payment_repository::PaymentRepositoryImpl;
pub use term_repository::TermRepositoryImpl;
