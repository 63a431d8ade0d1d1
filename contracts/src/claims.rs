//! Claim processor.
//!
//! Two mutually exclusive redemption modes:
//!
//! - **Liquid** (`claim`, `claim_all`): after a successful divest, or once
//!   the insurance deadline passed without any investment. Claims are burned
//!   for base asset at the class ratios.
//! - **Fallback** (`claim_senior`, `claim_junior`): invested but never
//!   divested. Claims are burned for venue receipt tokens at per-venue
//!   ratios frozen by the first claim touching each venue. Senior claims
//!   open at T2, junior claims at T3.
//!
//! The venue ratio is read from the live receipt balance on first touch,
//! so the claim order decides it for both classes.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TrancheError;
use crate::events::Claimed;
use crate::interfaces::{BaseAsset, ClaimLedger, PoolResult, YieldVenue};
use crate::phase_clock::Phase;
use crate::pool::TranchePool;
use crate::types::{TrancheClass, Venue};
use crate::waterfall::{payout_ratios, scaled_payout, venue_payout_ratio};

impl<'a, L, A, X, Y> TranchePool<'a, L, A, X, Y>
where
    L: ClaimLedger,
    A: BaseAsset,
    X: YieldVenue,
    Y: YieldVenue,
{
    // ========== Liquid Mode ==========

    /// Redeem senior and junior claims for base asset.
    pub fn claim(
        &mut self,
        caller: Address,
        senior_amount: U256,
        junior_amount: U256,
    ) -> PoolResult<Claimed> {
        self.atomically(|pool| {
            pool.activate_liquid_fallback();
            if !pool.state.liquid_mode {
                return Err(match pool.phase() {
                    Phase::Issuance | Phase::Insurance => TrancheError::StillInInsurancePeriod,
                    Phase::PendingDivest => TrancheError::DivestNotYetCalled,
                    Phase::AClaimWindow | Phase::BClaimWindow => {
                        TrancheError::UseClassSpecificClaim
                    }
                });
            }
            pool.redeem_liquid(caller, senior_amount, junior_amount)
        })
    }

    /// Redeem the caller's entire holdings of both classes.
    pub fn claim_all(&mut self, caller: Address) -> PoolResult<Claimed> {
        let senior_amount = self.ledger.balance_of(TrancheClass::Senior, caller);
        let junior_amount = self.ledger.balance_of(TrancheClass::Junior, caller);
        self.claim(caller, senior_amount, junior_amount)
    }

    // ========== Fallback Mode ==========

    /// Redeem senior claims for venue receipts (liquid payout if liquid).
    pub fn claim_senior(
        &mut self,
        caller: Address,
        to_venue_x: U256,
        to_venue_y: U256,
    ) -> PoolResult<Claimed> {
        self.claim_class(caller, TrancheClass::Senior, to_venue_x, to_venue_y)
    }

    /// Redeem junior claims for venue receipts (liquid payout if liquid).
    pub fn claim_junior(
        &mut self,
        caller: Address,
        to_venue_x: U256,
        to_venue_y: U256,
    ) -> PoolResult<Claimed> {
        self.claim_class(caller, TrancheClass::Junior, to_venue_x, to_venue_y)
    }

    fn claim_class(
        &mut self,
        caller: Address,
        class: TrancheClass,
        to_venue_x: U256,
        to_venue_y: U256,
    ) -> PoolResult<Claimed> {
        self.atomically(|pool| {
            let amount = to_venue_x
                .checked_add(to_venue_y)
                .ok_or(TrancheError::InvalidAmount)?;

            pool.activate_liquid_fallback();
            if pool.state.liquid_mode {
                return match class {
                    TrancheClass::Senior => pool.redeem_liquid(caller, amount, U256::zero()),
                    TrancheClass::Junior => pool.redeem_liquid(caller, U256::zero(), amount),
                };
            }

            let window = match class {
                TrancheClass::Senior => Phase::AClaimWindow,
                TrancheClass::Junior => Phase::BClaimWindow,
            };
            pool.schedule.require_phase_at_least(pool.now, window)?;
            pool.redeem_fallback(caller, class, to_venue_x, to_venue_y)
        })
    }

    // ========== Internals ==========

    /// Enter liquid mode when the insurance deadline passed with nothing
    /// invested. The pool balance is treated as the final balance with no
    /// interest.
    fn activate_liquid_fallback(&mut self) {
        if self.state.liquid_mode
            || self.state.invested
            || !self.schedule.insurance_over(self.now)
        {
            return;
        }

        let total_tranches = self.ledger.total_supply(TrancheClass::Senior) * U256::from(2u64);
        let (_, ratios) = payout_ratios(total_tranches, self.asset.balance(), U256::zero());

        self.state.liquid_mode = true;
        self.state.total_tranches = total_tranches;
        self.state.senior_payout_ratio = ratios.senior;
        self.state.junior_payout_ratio = ratios.junior;
    }

    fn redeem_liquid(
        &mut self,
        caller: Address,
        senior_amount: U256,
        junior_amount: U256,
    ) -> PoolResult<Claimed> {
        if senior_amount.is_zero() && junior_amount.is_zero() {
            return Err(TrancheError::InvalidAmount);
        }
        if self.ledger.balance_of(TrancheClass::Senior, caller) < senior_amount
            || self.ledger.balance_of(TrancheClass::Junior, caller) < junior_amount
        {
            return Err(TrancheError::InsufficientBalance);
        }

        let base_payout = scaled_payout(senior_amount, self.state.senior_payout_ratio)
            + scaled_payout(junior_amount, self.state.junior_payout_ratio);
        if base_payout > self.asset.balance() {
            return Err(TrancheError::InsufficientPoolBalance);
        }

        if !senior_amount.is_zero() {
            self.ledger.burn(TrancheClass::Senior, caller, senior_amount);
        }
        if !junior_amount.is_zero() {
            self.ledger.burn(TrancheClass::Junior, caller, junior_amount);
        }
        if !base_payout.is_zero() {
            self.asset.push(caller, base_payout)?;
        }

        Ok(Claimed {
            caller,
            senior_amount,
            junior_amount,
            base_payout,
            venue_x_payout: U256::zero(),
            venue_y_payout: U256::zero(),
        })
    }

    fn redeem_fallback(
        &mut self,
        caller: Address,
        class: TrancheClass,
        to_venue_x: U256,
        to_venue_y: U256,
    ) -> PoolResult<Claimed> {
        if to_venue_x.is_zero() && to_venue_y.is_zero() {
            return Err(TrancheError::InvalidAmount);
        }
        let amount = to_venue_x + to_venue_y;
        if self.ledger.balance_of(class, caller) < amount {
            return Err(TrancheError::InsufficientBalance);
        }

        let total_tranches = self.state.total_tranches;
        let (x_ratio, venue_x_payout) = venue_payout(
            &*self.venue_x,
            self.state.venue_payout_ratio(Venue::X),
            to_venue_x,
            total_tranches,
        );
        let (y_ratio, venue_y_payout) = venue_payout(
            &*self.venue_y,
            self.state.venue_payout_ratio(Venue::Y),
            to_venue_y,
            total_tranches,
        );
        if venue_x_payout > self.venue_x.receipt_balance()
            || venue_y_payout > self.venue_y.receipt_balance()
        {
            return Err(TrancheError::InsufficientPoolBalance);
        }

        if let Some(ratio) = x_ratio {
            self.state.freeze_venue_payout_ratio(Venue::X, ratio);
        }
        if let Some(ratio) = y_ratio {
            self.state.freeze_venue_payout_ratio(Venue::Y, ratio);
        }

        self.ledger.burn(class, caller, amount);
        if !venue_x_payout.is_zero() {
            self.venue_x.transfer_receipts(caller, venue_x_payout)?;
        }
        if !venue_y_payout.is_zero() {
            self.venue_y.transfer_receipts(caller, venue_y_payout)?;
        }

        let (senior_amount, junior_amount) = match class {
            TrancheClass::Senior => (amount, U256::zero()),
            TrancheClass::Junior => (U256::zero(), amount),
        };
        Ok(Claimed {
            caller,
            senior_amount,
            junior_amount,
            base_payout: U256::zero(),
            venue_x_payout,
            venue_y_payout,
        })
    }
}

/// Ratio to freeze and receipts owed for `amount` claims against one venue.
///
/// Untouched venues keep whatever ratio they had.
fn venue_payout<V: YieldVenue>(
    venue: &V,
    frozen: Option<U256>,
    amount: U256,
    total_tranches: U256,
) -> (Option<U256>, U256) {
    if amount.is_zero() {
        return (frozen, U256::zero());
    }
    let ratio = frozen.unwrap_or_else(|| venue_payout_ratio(venue.receipt_balance(), total_tranches));
    (Some(ratio), scaled_payout(amount, ratio))
}
