//! Tranche Pool Contracts
//!
//! Time-phased capital pool issuing senior ("A") and junior ("B") claims.
//! Pooled capital is split across two yield venues; at divestment losses
//! hit junior claims first and interest accrues to senior claims first.
//!
//! ## Architecture
//!
//! - **PhaseClock**: maps block time onto the five lifecycle phases
//! - **Waterfall**: loss regimes and fixed-point payout ratios
//! - **TranchePool**: pure engine for split, invest, divest and claims
//! - **TrancheSplitter**: on-chain host wiring the engine to other contracts
//! - **ClaimToken**: CEP-18 claim token minted and burned by the splitter
//! - **LendingPool / CompoundingMarket**: reference yield venues
//!
//! ## Redemption Modes
//!
//! - Liquid: after divest (or when nothing was ever invested), claims
//!   redeem for base asset at the class ratios
//! - Fallback: invested but never divested, claims redeem for venue
//!   receipts; senior claims open first, junior claims one window later

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod events;
pub mod interfaces;
pub mod phase_clock;
pub mod waterfall;

// Engine
pub mod pool;
pub mod divestment;
pub mod claims;

// Contract modules
pub mod adapters;
pub mod splitter;
pub mod claim_token;
pub mod venues;
