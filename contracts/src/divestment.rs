//! Divestment engine.
//!
//! One-shot unwind of both venues followed by the payout waterfall. A
//! successful divest switches the pool into liquid mode.

use odra::casper_types::U256;
use crate::errors::TrancheError;
use crate::events::Divested;
use crate::interfaces::{BaseAsset, ClaimLedger, PoolResult, YieldVenue};
use crate::phase_clock::Phase;
use crate::pool::TranchePool;
use crate::waterfall::{interest_over, payout_ratios};

impl<'a, L, A, X, Y> TranchePool<'a, L, A, X, Y>
where
    L: ClaimLedger,
    A: BaseAsset,
    X: YieldVenue,
    Y: YieldVenue,
{
    /// Withdraw everything from both venues and fix the class ratios.
    ///
    /// Interest is the excess of each venue's withdrawal over its principal
    /// share (`total_tranches / 2`); shortfalls only show up in the final
    /// balance.
    pub fn divest(&mut self) -> PoolResult<Divested> {
        if self.state.divested {
            return Err(TrancheError::AlreadyPerformed);
        }
        self.schedule.require_phase(self.now, Phase::PendingDivest)?;
        if !self.state.invested {
            return Err(TrancheError::NotInvested);
        }

        let total_tranches = self.state.total_tranches;
        let principal_share = total_tranches / U256::from(2u64);
        let venue_x_receipts = self.venue_x.receipt_balance();
        let venue_y_receipts = self.venue_y.receipt_balance();

        let before = self.asset.balance();
        if !venue_x_receipts.is_zero() {
            self.venue_x.withdraw(venue_x_receipts)?;
        }
        let after_x = self.asset.balance();
        if !venue_y_receipts.is_zero() {
            self.venue_y.withdraw(venue_y_receipts)?;
        }
        let final_balance = self.asset.balance();

        if !self.venue_x.receipt_balance().is_zero() || !self.venue_y.receipt_balance().is_zero() {
            return Err(TrancheError::IncompleteRedemption);
        }

        let withdrawn_x = after_x.saturating_sub(before);
        let withdrawn_y = final_balance.saturating_sub(after_x);
        let interest = interest_over(withdrawn_x, principal_share)
            + interest_over(withdrawn_y, principal_share);

        let (regime, ratios) = payout_ratios(total_tranches, final_balance, interest);

        self.state.divested = true;
        self.state.liquid_mode = true;
        self.state.senior_payout_ratio = ratios.senior;
        self.state.junior_payout_ratio = ratios.junior;

        Ok(Divested {
            final_balance,
            venue_x_receipts,
            venue_y_receipts,
            interest,
            regime,
        })
    }
}
