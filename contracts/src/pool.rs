//! Tranche pool engine.
//!
//! Pure implementation of the pool lifecycle over an explicit
//! `ProtocolState` and injected collaborators:
//!
//! 1. `split_risk` (Issuance): deposit base asset, mint equal A and B claims
//! 2. `invest` (Insurance, once): split the pool 50/50 across both venues
//! 3. `divest` (PendingDivest, once): unwind both venues, run the waterfall
//! 4. `claim*` (afterwards): redeem claims in liquid or fallback mode
//!
//! Operations validate everything before their first external effect and
//! return the event describing what happened. Divestment lives in
//! `divestment`, redemption in `claims`.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TrancheError;
use crate::events::{Invested, RiskSplit};
use crate::interfaces::{BaseAsset, ClaimLedger, PoolResult, YieldVenue};
use crate::phase_clock::{Phase, PhaseSchedule};
use crate::types::{ProtocolState, TrancheClass};

/// Pool engine bound to one state snapshot and one block time.
pub struct TranchePool<'a, L, A, X, Y> {
    pub(crate) state: &'a mut ProtocolState,
    pub(crate) schedule: &'a PhaseSchedule,
    pub(crate) now: u64,
    pub(crate) ledger: &'a mut L,
    pub(crate) asset: &'a mut A,
    pub(crate) venue_x: &'a mut X,
    pub(crate) venue_y: &'a mut Y,
}

impl<'a, L, A, X, Y> TranchePool<'a, L, A, X, Y>
where
    L: ClaimLedger,
    A: BaseAsset,
    X: YieldVenue,
    Y: YieldVenue,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: &'a mut ProtocolState,
        schedule: &'a PhaseSchedule,
        now: u64,
        ledger: &'a mut L,
        asset: &'a mut A,
        venue_x: &'a mut X,
        venue_y: &'a mut Y,
    ) -> Self {
        Self {
            state,
            schedule,
            now,
            ledger,
            asset,
            venue_x,
            venue_y,
        }
    }

    pub fn phase(&self) -> Phase {
        self.schedule.phase_at(self.now)
    }

    /// Run `op`, restoring the protocol state if it fails.
    pub(crate) fn atomically<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> PoolResult<T>,
    ) -> PoolResult<T> {
        let snapshot = self.state.clone();
        let result = op(self);
        if result.is_err() {
            *self.state = snapshot;
        }
        result
    }

    // ========== Risk Splitting ==========

    /// Deposit `amount` and mint half of it as each claim class.
    ///
    /// Odd amounts are truncated by one unit; that unit is never pulled.
    pub fn split_risk(&mut self, caller: Address, amount: U256) -> PoolResult<RiskSplit> {
        self.schedule.require_phase(self.now, Phase::Issuance)?;
        if amount <= U256::one() {
            return Err(TrancheError::InvalidAmount);
        }

        let amount = amount - amount % U256::from(2u64);
        let per_class = amount / U256::from(2u64);

        self.asset.pull(caller, amount)?;
        self.ledger.mint(TrancheClass::Senior, caller, per_class);
        self.ledger.mint(TrancheClass::Junior, caller, per_class);

        Ok(RiskSplit { caller, amount })
    }

    // ========== Investment ==========

    /// Move the pool into both venues, half each.
    ///
    /// An odd leftover unit stays idle in pool custody and is picked up by
    /// the final balance at divestment.
    pub fn invest(&mut self) -> PoolResult<Invested> {
        if self.state.invested {
            return Err(TrancheError::AlreadyPerformed);
        }
        self.schedule.require_phase(self.now, Phase::Insurance)?;

        let pool_amount = self.asset.balance();
        if pool_amount.is_zero() {
            return Err(TrancheError::InsufficientPoolBalance);
        }

        let total_tranches = self.ledger.total_supply(TrancheClass::Senior) * U256::from(2u64);
        if total_tranches.is_zero() {
            return Err(TrancheError::InsufficientPoolBalance);
        }

        let half = pool_amount / U256::from(2u64);
        self.venue_x.deposit(half)?;
        self.venue_y.deposit(half)?;

        self.state.invested = true;
        self.state.total_tranches = total_tranches;

        Ok(Invested {
            pool_amount,
            venue_x_receipts: self.venue_x.receipt_balance(),
            venue_y_receipts: self.venue_y.receipt_balance(),
        })
    }
}
