//! Common types used across the tranche pool.

use odra::casper_types::U256;

/// One hour in block-time units (milliseconds)
pub const HOUR_MS: u64 = 60 * 60 * 1000;

/// One day in block-time units (milliseconds)
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Claim class identifier
#[odra::odra_type]
#[derive(Copy, PartialOrd, Ord)]
pub enum TrancheClass {
    /// Senior "A" claims: paid first, capped on gains
    Senior,
    /// Junior "B" claims: absorb losses first
    Junior,
}

/// Yield venue identifier
#[odra::odra_type]
#[derive(Copy, PartialOrd, Ord)]
pub enum Venue {
    /// Lending pool (withdraw returns the amount paid out)
    X,
    /// Compounding market (mint/redeem return a status code)
    Y,
}

/// Window lengths used to derive the phase deadlines at deployment.
///
/// All values are in block-time units (milliseconds on Casper).
#[odra::odra_type]
pub struct ScheduleConfig {
    /// Length of the issuance window (deposits accepted)
    pub issuance_period: u64,
    /// Length of the insurance window (investment allowed)
    pub insurance_period: u64,
    /// Length of the divest window before senior claims open
    pub divest_period: u64,
    /// Length of the senior-only claim window before junior claims open
    pub a_claim_period: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            issuance_period: 7 * DAY_MS,
            insurance_period: 14 * DAY_MS,
            divest_period: DAY_MS,
            a_claim_period: 7 * DAY_MS,
        }
    }
}

/// Protocol state mutated by the five pool operations.
///
/// `total_tranches`, the class ratios and the venue ratios are each written
/// at most once and never change afterwards.
#[odra::odra_type]
#[derive(Default)]
pub struct ProtocolState {
    /// Set by a successful `invest()`
    pub invested: bool,
    /// Set by a successful `divest()`
    pub divested: bool,
    /// Redemptions pay out the base asset; never reverts to false
    pub liquid_mode: bool,
    /// 2 x senior supply at investment (or at liquid fallback)
    pub total_tranches: U256,
    /// Base asset per senior claim, scaled by `PAYOUT_SCALE`
    pub senior_payout_ratio: U256,
    /// Base asset per junior claim, scaled by `PAYOUT_SCALE`
    pub junior_payout_ratio: U256,
    /// Venue X receipts per claim, frozen on first fallback claim touching X
    pub venue_x_payout_ratio: Option<U256>,
    /// Venue Y receipts per claim, frozen on first fallback claim touching Y
    pub venue_y_payout_ratio: Option<U256>,
}

impl ProtocolState {
    pub fn venue_payout_ratio(&self, venue: Venue) -> Option<U256> {
        match venue {
            Venue::X => self.venue_x_payout_ratio,
            Venue::Y => self.venue_y_payout_ratio,
        }
    }

    pub fn freeze_venue_payout_ratio(&mut self, venue: Venue, ratio: U256) {
        match venue {
            Venue::X => self.venue_x_payout_ratio = Some(ratio),
            Venue::Y => self.venue_y_payout_ratio = Some(ratio),
        }
    }
}
