//! Payout waterfall.
//!
//! Splits the divested pool between the two claim classes. Junior claims
//! absorb losses first; senior claims take accumulated interest first.
//! Ratios are base asset per claim token, scaled by `PAYOUT_SCALE`.
//!
//! With `T = total_tranches` and `H = T / 2` (senior principal):
//!
//! - Full coverage (`final >= T`): both classes get `final / T`
//! - Partial coverage (`H < final < T`): senior gets `1 + interest / H`,
//!   junior gets `(final - H - interest) / H`
//! - Severe loss (`final <= H`): senior gets `final / H`, junior gets zero

use odra::casper_types::U256;

/// Fixed-point scale for payout ratios (1e27)
pub const PAYOUT_SCALE: u128 = 1_000_000_000_000_000_000_000_000_000;

/// Loss regime reached at divestment
#[odra::odra_type]
#[derive(Copy)]
pub enum LossRegime {
    /// Pool returned at least the full principal
    FullCoverage,
    /// Senior principal covered, junior partially impaired
    PartialCoverage,
    /// Senior principal impaired, junior wiped out
    SevereLoss,
}

/// Per-class payout ratios
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct PayoutRatios {
    /// Base asset per senior claim (scaled)
    pub senior: U256,
    /// Base asset per junior claim (scaled)
    pub junior: U256,
}

pub fn scale() -> U256 {
    U256::from(PAYOUT_SCALE)
}

/// Classify a final balance against the full principal.
pub fn classify(total_tranches: U256, final_balance: U256) -> LossRegime {
    let senior_principal = total_tranches / U256::from(2u64);
    if final_balance >= total_tranches {
        LossRegime::FullCoverage
    } else if final_balance > senior_principal {
        LossRegime::PartialCoverage
    } else {
        LossRegime::SevereLoss
    }
}

/// Compute the class ratios for a divested pool.
///
/// A zero `total_tranches` means no claims were ever issued; both ratios are
/// then 1.0 so the result is still well defined.
pub fn payout_ratios(
    total_tranches: U256,
    final_balance: U256,
    interest: U256,
) -> (LossRegime, PayoutRatios) {
    if total_tranches.is_zero() {
        return (
            LossRegime::FullCoverage,
            PayoutRatios { senior: scale(), junior: scale() },
        );
    }

    let senior_principal = total_tranches / U256::from(2u64);
    let regime = classify(total_tranches, final_balance);

    let ratios = match regime {
        LossRegime::FullCoverage => {
            let ratio = final_balance * scale() / total_tranches;
            PayoutRatios { senior: ratio, junior: ratio }
        }
        LossRegime::PartialCoverage => {
            let senior = scale() + interest * scale() / senior_principal;
            let junior_residual = final_balance
                .saturating_sub(senior_principal)
                .saturating_sub(interest);
            PayoutRatios {
                senior,
                junior: junior_residual * scale() / senior_principal,
            }
        }
        LossRegime::SevereLoss => PayoutRatios {
            senior: final_balance * scale() / senior_principal,
            junior: U256::zero(),
        },
    };

    (regime, ratios)
}

/// Amount withdrawn above the principal share, or zero.
pub fn interest_over(withdrawn: U256, principal_share: U256) -> U256 {
    withdrawn.saturating_sub(principal_share)
}

/// Convert a claim amount into a payout using a scaled ratio (rounds down).
pub fn scaled_payout(amount: U256, ratio: U256) -> U256 {
    amount * ratio / scale()
}

/// Receipts owed per claim token for a venue in fallback mode.
///
/// Each venue received half of the pool, so its receipts back the
/// per-venue principal share `total_tranches / 2`.
pub fn venue_payout_ratio(venue_receipts: U256, total_tranches: U256) -> U256 {
    let principal_share = total_tranches / U256::from(2u64);
    if principal_share.is_zero() {
        return U256::zero();
    }
    venue_receipts * scale() / principal_share
}
