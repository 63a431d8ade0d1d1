//! Collaborator interfaces consumed by the pool engine.
//!
//! The engine never talks to storage or other contracts directly. On-chain
//! it is wired to cross-contract adapters (see `adapters`); in tests it runs
//! against in-memory fakes.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TrancheError;
use crate::types::TrancheClass;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, TrancheError>;

/// Accounting for the two claim classes.
pub trait ClaimLedger {
    fn mint(&mut self, class: TrancheClass, to: Address, amount: U256);
    fn burn(&mut self, class: TrancheClass, from: Address, amount: U256);
    fn balance_of(&self, class: TrancheClass, owner: Address) -> U256;
    fn total_supply(&self, class: TrancheClass) -> U256;
}

/// The base asset held in pool custody.
pub trait BaseAsset {
    /// Pool custody balance
    fn balance(&self) -> U256;
    /// Move `amount` from `from` into pool custody
    fn pull(&mut self, from: Address, amount: U256) -> PoolResult<()>;
    /// Move `amount` out of pool custody to `to`
    fn push(&mut self, to: Address, amount: U256) -> PoolResult<()>;
}

/// Uniform view over a yield venue.
///
/// Venues disagree on how they report withdrawals (amount returned vs.
/// status code). Adapters normalise failures into errors and the engine
/// measures base asset deltas itself.
pub trait YieldVenue {
    /// Receipt tokens held by the pool
    fn receipt_balance(&self) -> U256;
    /// Deposit base asset from pool custody
    fn deposit(&mut self, amount: U256) -> PoolResult<()>;
    /// Redeem `receipts` back into pool custody
    fn withdraw(&mut self, receipts: U256) -> PoolResult<()>;
    /// Hand receipt tokens to a claimant
    fn transfer_receipts(&mut self, to: Address, amount: U256) -> PoolResult<()>;
}
