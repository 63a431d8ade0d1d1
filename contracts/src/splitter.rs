//! Tranche Splitter Contract
//!
//! On-chain host for the pool engine. Holds the base asset and both venue
//! positions, stores the phase schedule and protocol state, and exposes the
//! lifecycle entry points:
//!
//! - `split_risk`: deposit base asset for equal senior and junior claims
//! - `invest` / `divest`: permissionless one-shot transitions
//! - `claim` / `claim_all`: liquid redemption for base asset
//! - `claim_senior` / `claim_junior`: fallback redemption for venue receipts
//!
//! Each entry point wires cross-contract adapters into a `TranchePool`,
//! persists the resulting state and emits the event. Engine errors revert
//! the whole call.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::adapters::{ClaimTokens, CompoundingVenue, LendingVenue, PoolAsset};
use crate::errors::TrancheError;
use crate::events::{Claimed, Divested, Invested, RiskSplit};
use crate::interfaces::PoolResult;
use crate::phase_clock::{Phase, PhaseSchedule};
use crate::pool::TranchePool;
use crate::types::{ProtocolState, ScheduleConfig};
use crate::waterfall::PayoutRatios;

type OnChainPool<'a> =
    TranchePool<'a, ClaimTokens<'a>, PoolAsset<'a>, LendingVenue<'a>, CompoundingVenue<'a>>;

/// Tranche Splitter Contract
#[odra::module(events = [RiskSplit, Invested, Divested, Claimed])]
pub struct TrancheSplitter {
    /// CEP-18 base asset
    base_asset: Var<Address>,
    /// Senior (A) claim token
    senior_token: Var<Address>,
    /// Junior (B) claim token
    junior_token: Var<Address>,
    /// Lending pool venue
    venue_x: Var<Address>,
    /// Compounding market venue
    venue_y: Var<Address>,
    schedule: Var<PhaseSchedule>,
    state: Var<ProtocolState>,
}

#[odra::module]
impl TrancheSplitter {
    /// Initialize the splitter; phase deadlines start from the current block time
    pub fn init(
        &mut self,
        base_asset: Address,
        senior_token: Address,
        junior_token: Address,
        venue_x: Address,
        venue_y: Address,
        config: ScheduleConfig,
    ) {
        let now = self.env().get_block_time();
        let schedule = match PhaseSchedule::starting_at(now, &config) {
            Ok(schedule) => schedule,
            Err(error) => self.env().revert(error),
        };

        self.base_asset.set(base_asset);
        self.senior_token.set(senior_token);
        self.junior_token.set(junior_token);
        self.venue_x.set(venue_x);
        self.venue_y.set(venue_y);
        self.schedule.set(schedule);
        self.state.set(ProtocolState::default());
    }

    // ========== Lifecycle ==========

    /// Deposit `amount` base asset (requires prior approval)
    pub fn split_risk(&mut self, amount: U256) {
        let caller = self.env().caller();
        let event = self.execute(|pool| pool.split_risk(caller, amount));
        self.env().emit_event(event);
    }

    pub fn invest(&mut self) {
        let event = self.execute(|pool| pool.invest());
        self.env().emit_event(event);
    }

    pub fn divest(&mut self) {
        let event = self.execute(|pool| pool.divest());
        self.env().emit_event(event);
    }

    // ========== Claims ==========

    pub fn claim(&mut self, senior_amount: U256, junior_amount: U256) {
        let caller = self.env().caller();
        let event = self.execute(|pool| pool.claim(caller, senior_amount, junior_amount));
        self.env().emit_event(event);
    }

    pub fn claim_all(&mut self) {
        let caller = self.env().caller();
        let event = self.execute(|pool| pool.claim_all(caller));
        self.env().emit_event(event);
    }

    pub fn claim_senior(&mut self, to_venue_x: U256, to_venue_y: U256) {
        let caller = self.env().caller();
        let event = self.execute(|pool| pool.claim_senior(caller, to_venue_x, to_venue_y));
        self.env().emit_event(event);
    }

    pub fn claim_junior(&mut self, to_venue_x: U256, to_venue_y: U256) {
        let caller = self.env().caller();
        let event = self.execute(|pool| pool.claim_junior(caller, to_venue_x, to_venue_y));
        self.env().emit_event(event);
    }

    // ========== Views ==========

    pub fn phase(&self) -> Phase {
        self.get_schedule().phase_at(self.env().get_block_time())
    }

    pub fn get_schedule(&self) -> PhaseSchedule {
        match self.schedule.get() {
            Some(schedule) => schedule,
            None => self.env().revert(TrancheError::NotConfigured),
        }
    }

    pub fn get_state(&self) -> ProtocolState {
        self.state.get_or_default()
    }

    pub fn get_payout_ratios(&self) -> PayoutRatios {
        let state = self.get_state();
        PayoutRatios {
            senior: state.senior_payout_ratio,
            junior: state.junior_payout_ratio,
        }
    }

    /// Frozen fallback ratios for venue X and venue Y
    pub fn get_venue_payout_ratios(&self) -> (Option<U256>, Option<U256>) {
        let state = self.get_state();
        (state.venue_x_payout_ratio, state.venue_y_payout_ratio)
    }

    pub fn get_total_tranches(&self) -> U256 {
        self.get_state().total_tranches
    }

    pub fn is_invested(&self) -> bool {
        self.get_state().invested
    }

    pub fn is_divested(&self) -> bool {
        self.get_state().divested
    }

    pub fn is_liquid_mode(&self) -> bool {
        self.get_state().liquid_mode
    }

    pub fn get_base_asset(&self) -> Option<Address> {
        self.base_asset.get()
    }

    pub fn get_senior_token(&self) -> Option<Address> {
        self.senior_token.get()
    }

    pub fn get_junior_token(&self) -> Option<Address> {
        self.junior_token.get()
    }

    pub fn get_venue_x(&self) -> Option<Address> {
        self.venue_x.get()
    }

    pub fn get_venue_y(&self) -> Option<Address> {
        self.venue_y.get()
    }
}

impl TrancheSplitter {
    /// Run one engine operation against the deployed collaborators.
    ///
    /// State is written back only on success; errors revert the call.
    fn execute<T>(&mut self, op: impl FnOnce(&mut OnChainPool<'_>) -> PoolResult<T>) -> T {
        let env = self.env();
        let custody = env.self_address();
        let base_asset = self.configured(&self.base_asset);
        let senior_token = self.configured(&self.senior_token);
        let junior_token = self.configured(&self.junior_token);
        let venue_x = self.configured(&self.venue_x);
        let venue_y = self.configured(&self.venue_y);
        let schedule = self.get_schedule();
        let mut state = self.get_state();

        let mut ledger = ClaimTokens::new(&env, senior_token, junior_token);
        let mut asset = PoolAsset::new(&env, base_asset, custody);
        let mut lending = LendingVenue::new(&env, venue_x, base_asset, custody);
        let mut compounding = CompoundingVenue::new(&env, venue_y, base_asset, custody);

        let result = {
            let mut pool = TranchePool::new(
                &mut state,
                &schedule,
                env.get_block_time(),
                &mut ledger,
                &mut asset,
                &mut lending,
                &mut compounding,
            );
            op(&mut pool)
        };

        match result {
            Ok(value) => {
                self.state.set(state);
                value
            }
            Err(error) => env.revert(error),
        }
    }

    fn configured(&self, slot: &Var<Address>) -> Address {
        match slot.get() {
            Some(address) => address,
            None => self.env().revert(TrancheError::NotConfigured),
        }
    }
}
