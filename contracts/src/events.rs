//! Events emitted by the tranche splitter.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::waterfall::LossRegime;

/// Deposit split into equal senior and junior claims
#[odra::event]
pub struct RiskSplit {
    pub caller: Address,
    /// Deposit after odd-unit truncation
    pub amount: U256,
}

/// Pool capital moved into both venues
#[odra::event]
pub struct Invested {
    /// Pool balance at investment
    pub pool_amount: U256,
    pub venue_x_receipts: U256,
    pub venue_y_receipts: U256,
}

/// Both venues unwound and class ratios fixed
#[odra::event]
pub struct Divested {
    pub final_balance: U256,
    /// Venue X receipts held before withdrawal
    pub venue_x_receipts: U256,
    /// Venue Y receipts held before withdrawal
    pub venue_y_receipts: U256,
    pub interest: U256,
    pub regime: LossRegime,
}

/// Claims redeemed, in either mode
#[odra::event]
pub struct Claimed {
    pub caller: Address,
    pub senior_amount: U256,
    pub junior_amount: U256,
    pub base_payout: U256,
    pub venue_x_payout: U256,
    pub venue_y_payout: U256,
}
