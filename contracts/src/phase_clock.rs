//! Phase clock.
//!
//! Maps block time onto the five lifecycle phases:
//!
//! | Phase          | Window       |
//! |----------------|--------------|
//! | Issuance       | t < S        |
//! | Insurance      | S <= t < T1  |
//! | PendingDivest  | T1 <= t < T2 |
//! | AClaimWindow   | T2 <= t < T3 |
//! | BClaimWindow   | t >= T3      |

use crate::errors::TrancheError;
use crate::interfaces::PoolResult;
use crate::types::ScheduleConfig;

/// Lifecycle phase, ordered from first to last
#[odra::odra_type]
#[derive(Copy, PartialOrd, Ord)]
pub enum Phase {
    /// Deposits accepted
    Issuance,
    /// Capital may be invested
    Insurance,
    /// Capital may be divested
    PendingDivest,
    /// Senior fallback claims open
    AClaimWindow,
    /// Junior fallback claims open
    BClaimWindow,
}

/// Immutable phase deadlines fixed at deployment
#[odra::odra_type]
#[derive(Copy)]
pub struct PhaseSchedule {
    /// S: end of issuance
    pub issuance_deadline: u64,
    /// T1: end of insurance
    pub insurance_deadline: u64,
    /// T2: senior claims open
    pub a_claim_open: u64,
    /// T3: junior claims open
    pub b_claim_open: u64,
}

impl PhaseSchedule {
    /// Derive deadlines as running sums of the configured windows.
    pub fn starting_at(now: u64, config: &ScheduleConfig) -> PoolResult<Self> {
        let periods = [
            config.issuance_period,
            config.insurance_period,
            config.divest_period,
            config.a_claim_period,
        ];
        if periods.iter().any(|period| *period == 0) {
            return Err(TrancheError::InvalidConfig);
        }

        let issuance_deadline = now
            .checked_add(config.issuance_period)
            .ok_or(TrancheError::InvalidConfig)?;
        let insurance_deadline = issuance_deadline
            .checked_add(config.insurance_period)
            .ok_or(TrancheError::InvalidConfig)?;
        let a_claim_open = insurance_deadline
            .checked_add(config.divest_period)
            .ok_or(TrancheError::InvalidConfig)?;
        let b_claim_open = a_claim_open
            .checked_add(config.a_claim_period)
            .ok_or(TrancheError::InvalidConfig)?;

        Ok(Self {
            issuance_deadline,
            insurance_deadline,
            a_claim_open,
            b_claim_open,
        })
    }

    pub fn phase_at(&self, now: u64) -> Phase {
        if now < self.issuance_deadline {
            Phase::Issuance
        } else if now < self.insurance_deadline {
            Phase::Insurance
        } else if now < self.a_claim_open {
            Phase::PendingDivest
        } else if now < self.b_claim_open {
            Phase::AClaimWindow
        } else {
            Phase::BClaimWindow
        }
    }

    pub fn require_phase(&self, now: u64, expected: Phase) -> PoolResult<()> {
        if self.phase_at(now) != expected {
            return Err(TrancheError::PhaseViolation);
        }
        Ok(())
    }

    pub fn require_phase_at_least(&self, now: u64, earliest: Phase) -> PoolResult<()> {
        if self.phase_at(now) < earliest {
            return Err(TrancheError::PhaseViolation);
        }
        Ok(())
    }

    /// True once the insurance deadline (T1) has passed
    pub fn insurance_over(&self, now: u64) -> bool {
        now >= self.insurance_deadline
    }
}
