//! Tranche Pool Integration Tests
//!
//! End-to-end scenarios against the Odra test VM: base asset, claim
//! tokens, both reference venues and the splitter deployed together.

#[cfg(test)]
mod tests {
    use odra::casper_types::U256;
    use odra::host::{Deployer, HostEnv};
    use odra::prelude::*;
    use pretty_assertions::assert_eq;
    use tranche_pool_contracts::claim_token::{ClaimToken, ClaimTokenHostRef, ClaimTokenInitArgs};
    use tranche_pool_contracts::errors::TrancheError;
    use tranche_pool_contracts::events::{Claimed, Divested, Invested, RiskSplit};
    use tranche_pool_contracts::phase_clock::Phase;
    use tranche_pool_contracts::splitter::{
        TrancheSplitter, TrancheSplitterHostRef, TrancheSplitterInitArgs,
    };
    use tranche_pool_contracts::types::ScheduleConfig;
    use tranche_pool_contracts::venues::{
        CompoundingMarket, CompoundingMarketHostRef, CompoundingMarketInitArgs, LendingPool,
        LendingPoolHostRef, LendingPoolInitArgs,
    };
    use tranche_pool_contracts::waterfall::{scale, LossRegime};

    /// Length of every phase window (ms)
    const PERIOD: u64 = 1_000;

    struct Deployment {
        env: HostEnv,
        admin: Address,
        alice: Address,
        bob: Address,
        base: ClaimTokenHostRef,
        senior: ClaimTokenHostRef,
        junior: ClaimTokenHostRef,
        lending: LendingPoolHostRef,
        market: CompoundingMarketHostRef,
        splitter: TrancheSplitterHostRef,
    }

    fn units(n: u64) -> U256 {
        U256::from(n)
    }

    fn token(env: &HostEnv, symbol: &str) -> ClaimTokenHostRef {
        ClaimToken::deploy(
            env,
            ClaimTokenInitArgs {
                name: format!("{} token", symbol),
                symbol: String::from(symbol),
                decimals: 9,
            },
        )
    }

    fn setup() -> Deployment {
        let env = odra_test::env();
        let admin = env.get_account(0);
        let alice = env.get_account(1);
        let bob = env.get_account(2);
        env.set_caller(admin);

        let mut base = token(&env, "BASE");
        let mut senior = token(&env, "TRA");
        let mut junior = token(&env, "TRB");
        let base_addr = base.address().clone();

        let lending = LendingPool::deploy(&env, LendingPoolInitArgs { underlying: base_addr });
        let market = CompoundingMarket::deploy(
            &env,
            CompoundingMarketInitArgs { underlying: base_addr },
        );
        let splitter = TrancheSplitter::deploy(
            &env,
            TrancheSplitterInitArgs {
                base_asset: base_addr,
                senior_token: senior.address().clone(),
                junior_token: junior.address().clone(),
                venue_x: lending.address().clone(),
                venue_y: market.address().clone(),
                config: ScheduleConfig {
                    issuance_period: PERIOD,
                    insurance_period: PERIOD,
                    divest_period: PERIOD,
                    a_claim_period: PERIOD,
                },
            },
        );

        senior.add_minter(splitter.address().clone());
        junior.add_minter(splitter.address().clone());
        base.add_minter(admin);
        base.mint(alice, units(1_000));
        base.mint(bob, units(1_000));

        Deployment {
            env,
            admin,
            alice,
            bob,
            base,
            senior,
            junior,
            lending,
            market,
            splitter,
        }
    }

    impl Deployment {
        fn deposit(&mut self, who: Address, amount: u64) {
            self.env.set_caller(who);
            self.base.approve(self.splitter.address().clone(), units(amount));
            self.splitter.split_risk(units(amount));
        }

        /// Alice deposits 600 and Bob 400, then the pool is invested.
        fn invested(&mut self) {
            let (alice, bob) = (self.alice, self.bob);
            self.deposit(alice, 600);
            self.deposit(bob, 400);
            self.env.advance_block_time(PERIOD);
            self.splitter.invest();
        }

        /// Revalue a venue as the admin; gains are backed by fresh base asset.
        fn revalue(&mut self, lending_assets: u64, market_assets: u64) {
            self.env.set_caller(self.admin);
            if lending_assets > 500 {
                self.base
                    .mint(self.lending.address().clone(), units(lending_assets - 500));
            }
            if market_assets > 500 {
                self.base
                    .mint(self.market.address().clone(), units(market_assets - 500));
            }
            self.lending.set_total_assets(units(lending_assets));
            self.market.set_total_assets(units(market_assets));
        }

        fn pool_balance(&self) -> U256 {
            self.base.balance_of(self.splitter.address().clone())
        }
    }

    fn ratio(numerator: u64, denominator: u64) -> U256 {
        U256::from(numerator) * scale() / U256::from(denominator)
    }

    #[test]
    fn test_phases_follow_block_time() {
        let d = setup();
        assert_eq!(d.splitter.phase(), Phase::Issuance);
        d.env.advance_block_time(PERIOD);
        assert_eq!(d.splitter.phase(), Phase::Insurance);
        d.env.advance_block_time(PERIOD);
        assert_eq!(d.splitter.phase(), Phase::PendingDivest);
        d.env.advance_block_time(PERIOD);
        assert_eq!(d.splitter.phase(), Phase::AClaimWindow);
        d.env.advance_block_time(PERIOD);
        assert_eq!(d.splitter.phase(), Phase::BClaimWindow);
    }

    #[test]
    fn test_split_risk_mints_both_classes() {
        let mut d = setup();
        let alice = d.alice;
        d.deposit(alice, 600);

        assert_eq!(d.senior.balance_of(alice), units(300));
        assert_eq!(d.junior.balance_of(alice), units(300));
        assert_eq!(d.pool_balance(), units(600));
        assert_eq!(d.base.balance_of(alice), units(400));
        assert!(d.env.emitted_event(
            &d.splitter,
            RiskSplit {
                caller: alice,
                amount: units(600),
            }
        ));
    }

    #[test]
    fn test_odd_deposit_keeps_the_spare_unit() {
        let mut d = setup();
        let alice = d.alice;
        d.deposit(alice, 101);

        assert_eq!(d.senior.balance_of(alice), units(50));
        assert_eq!(d.junior.balance_of(alice), units(50));
        assert_eq!(d.base.balance_of(alice), units(900));
        assert_eq!(d.pool_balance(), units(100));
    }

    #[test]
    fn test_split_risk_closes_after_issuance() {
        let mut d = setup();
        d.env.advance_block_time(PERIOD);
        d.env.set_caller(d.alice);
        d.base.approve(d.splitter.address().clone(), units(10));

        assert_eq!(
            d.splitter.try_split_risk(units(10)),
            Err(TrancheError::PhaseViolation.into())
        );
    }

    #[test]
    fn test_invest_moves_pool_into_venues() {
        let mut d = setup();
        d.invested();

        let splitter = d.splitter.address().clone();
        assert!(d.splitter.is_invested());
        assert_eq!(d.splitter.get_total_tranches(), units(1_000));
        assert_eq!(d.lending.balance_of(splitter), units(500));
        assert_eq!(d.market.balance_of(splitter), units(500));
        assert!(d.pool_balance().is_zero());
        assert!(d.env.emitted_event(
            &d.splitter,
            Invested {
                pool_amount: units(1_000),
                venue_x_receipts: units(500),
                venue_y_receipts: units(500),
            }
        ));

        assert_eq!(
            d.splitter.try_invest(),
            Err(TrancheError::AlreadyPerformed.into())
        );
    }

    #[test]
    fn test_full_lifecycle_with_gains() {
        let mut d = setup();
        d.invested();
        d.revalue(560, 460);
        d.env.advance_block_time(PERIOD);
        d.splitter.divest();

        assert!(d.splitter.is_liquid_mode());
        assert_eq!(d.pool_balance(), units(1_020));
        assert!(d.env.emitted_event(
            &d.splitter,
            Divested {
                final_balance: units(1_020),
                venue_x_receipts: units(500),
                venue_y_receipts: units(500),
                interest: units(60),
                regime: LossRegime::FullCoverage,
            }
        ));
        let ratios = d.splitter.get_payout_ratios();
        assert_eq!(ratios.senior, ratio(102, 100));
        assert_eq!(ratios.junior, ratio(102, 100));

        let (alice, bob) = (d.alice, d.bob);
        d.env.set_caller(alice);
        d.splitter.claim_all();
        d.env.set_caller(bob);
        d.splitter.claim_all();

        assert_eq!(d.base.balance_of(alice), units(400 + 612));
        assert_eq!(d.base.balance_of(bob), units(600 + 408));
        assert!(d.pool_balance().is_zero());
        assert!(d.senior.total_supply().is_zero());
        assert!(d.junior.total_supply().is_zero());
        assert!(d.env.emitted_event(
            &d.splitter,
            Claimed {
                caller: bob,
                senior_amount: units(200),
                junior_amount: units(200),
                base_payout: units(408),
                venue_x_payout: U256::zero(),
                venue_y_payout: U256::zero(),
            }
        ));
    }

    #[test]
    fn test_partial_coverage_protects_senior() {
        let mut d = setup();
        d.invested();
        d.revalue(550, 350);
        d.env.advance_block_time(PERIOD);
        d.splitter.divest();

        let ratios = d.splitter.get_payout_ratios();
        assert_eq!(ratios.senior, ratio(110, 100));
        assert_eq!(ratios.junior, ratio(70, 100));

        let alice = d.alice;
        d.env.set_caller(alice);
        d.splitter.claim(units(300), units(300));
        // 300 x 1.10 + 300 x 0.70
        assert_eq!(d.base.balance_of(alice), units(400 + 540));
        assert_eq!(d.pool_balance(), units(360));
    }

    #[test]
    fn test_severe_loss_wipes_junior() {
        let mut d = setup();
        d.invested();
        d.revalue(400, 0);
        d.env.advance_block_time(PERIOD);
        d.splitter.divest();

        let ratios = d.splitter.get_payout_ratios();
        assert_eq!(ratios.senior, ratio(80, 100));
        assert!(ratios.junior.is_zero());

        let bob = d.bob;
        d.env.set_caller(bob);
        d.splitter.claim_all();
        assert_eq!(d.base.balance_of(bob), units(600 + 160));
        assert!(d.junior.balance_of(bob).is_zero());
    }

    #[test]
    fn test_paused_market_blocks_invest_atomically() {
        let mut d = setup();
        let (alice, bob) = (d.alice, d.bob);
        d.deposit(alice, 600);
        d.deposit(bob, 400);
        d.env.set_caller(d.admin);
        d.market.set_paused(true);
        d.env.advance_block_time(PERIOD);

        assert_eq!(
            d.splitter.try_invest(),
            Err(TrancheError::VenueOperationFailed.into())
        );
        // The venue X deposit was rolled back with the rest of the call
        assert!(d.lending.balance_of(d.splitter.address().clone()).is_zero());
        assert_eq!(d.pool_balance(), units(1_000));
        assert!(!d.splitter.is_invested());

        d.market.set_paused(false);
        d.splitter.invest();
        assert!(d.splitter.is_invested());
        assert_eq!(d.market.balance_of(d.splitter.address().clone()), units(500));
    }

    #[test]
    fn test_paused_market_blocks_divest_atomically() {
        let mut d = setup();
        d.invested();
        d.env.set_caller(d.admin);
        d.market.set_paused(true);
        d.env.advance_block_time(PERIOD);

        assert_eq!(
            d.splitter.try_divest(),
            Err(TrancheError::VenueRedeemFailed.into())
        );
        // Venue X withdrawal was rolled back with the rest of the call
        assert_eq!(d.lending.balance_of(d.splitter.address().clone()), units(500));
        assert!(!d.splitter.is_liquid_mode());

        d.market.set_paused(false);
        d.splitter.divest();
        assert!(d.splitter.get_state().divested);
        assert_eq!(
            d.splitter.try_divest(),
            Err(TrancheError::AlreadyPerformed.into())
        );
    }

    #[test]
    fn test_claim_reports_why_it_is_early() {
        let mut d = setup();
        d.invested();
        d.env.set_caller(d.alice);

        assert_eq!(
            d.splitter.try_claim_all(),
            Err(TrancheError::StillInInsurancePeriod.into())
        );
        d.env.advance_block_time(PERIOD);
        assert_eq!(
            d.splitter.try_claim_all(),
            Err(TrancheError::DivestNotYetCalled.into())
        );
        d.env.advance_block_time(PERIOD);
        assert_eq!(
            d.splitter.try_claim(units(1), units(1)),
            Err(TrancheError::UseClassSpecificClaim.into())
        );
    }

    #[test]
    fn test_fallback_claims_pay_receipts() {
        let mut d = setup();
        d.invested();
        d.env.advance_block_time(2 * PERIOD);

        let (alice, bob) = (d.alice, d.bob);
        d.env.set_caller(alice);
        d.splitter.claim_senior(units(100), units(50));
        assert_eq!(d.lending.balance_of(alice), units(100));
        assert_eq!(d.market.balance_of(alice), units(50));
        assert_eq!(d.senior.balance_of(alice), units(150));
        assert_eq!(
            d.splitter.get_venue_payout_ratios(),
            (Some(scale()), Some(scale()))
        );

        d.env.set_caller(bob);
        assert_eq!(
            d.splitter.try_claim_junior(units(10), U256::zero()),
            Err(TrancheError::PhaseViolation.into())
        );

        d.env.advance_block_time(PERIOD);
        d.splitter.claim_junior(units(200), U256::zero());
        // Ratio frozen by Alice's claim despite the lower venue balance
        assert_eq!(d.lending.balance_of(bob), units(200));
        assert!(d.junior.balance_of(bob).is_zero());
        assert!(!d.splitter.is_liquid_mode());
    }

    #[test]
    fn test_uninvested_pool_falls_back_to_liquid() {
        let mut d = setup();
        let (alice, bob) = (d.alice, d.bob);
        d.deposit(alice, 600);
        d.deposit(bob, 400);
        d.env.advance_block_time(2 * PERIOD);

        d.env.set_caller(alice);
        d.splitter.claim_all();
        assert!(d.splitter.is_liquid_mode());
        assert!(!d.splitter.is_invested());
        assert_eq!(d.base.balance_of(alice), units(1_000));

        d.env.advance_block_time(2 * PERIOD);
        d.env.set_caller(bob);
        d.splitter.claim_junior(units(200), U256::zero());
        assert_eq!(d.base.balance_of(bob), units(800));
    }

    #[test]
    fn test_divest_without_investment_fails() {
        let mut d = setup();
        let alice = d.alice;
        d.deposit(alice, 100);
        d.env.advance_block_time(2 * PERIOD);

        assert_eq!(d.splitter.try_divest(), Err(TrancheError::NotInvested.into()));
    }

    #[test]
    fn test_only_minters_touch_claim_tokens() {
        let mut d = setup();
        let alice = d.alice;
        d.env.set_caller(alice);

        assert_eq!(
            d.senior.try_mint(alice, units(1)),
            Err(TrancheError::Unauthorized.into())
        );
        assert_eq!(
            d.junior.try_add_minter(alice),
            Err(TrancheError::Unauthorized.into())
        );
        assert!(d.senior.is_minter(d.splitter.address().clone()));
    }

    #[test]
    fn test_venue_admin_is_enforced() {
        let mut d = setup();
        d.env.set_caller(d.bob);

        assert_eq!(
            d.lending.try_set_total_assets(units(1)),
            Err(TrancheError::Unauthorized.into())
        );
        assert_eq!(
            d.market.try_set_paused(true),
            Err(TrancheError::Unauthorized.into())
        );
    }
}
