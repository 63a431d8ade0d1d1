//! Deploy the tranche pool to Casper livenet/testnet using Odra livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000
//!
//! Optional phase windows in milliseconds (defaults: 7d / 14d / 1d / 7d):
//!   TRANCHE_ISSUANCE_PERIOD_MS
//!   TRANCHE_INSURANCE_PERIOD_MS
//!   TRANCHE_DIVEST_PERIOD_MS
//!   TRANCHE_A_CLAIM_PERIOD_MS
//!
//! Optional TRANCHE_TEST_SUPPLY mints that much test base asset to the deployer.

use odra::casper_types::U256;
use odra::host::Deployer;
use odra::prelude::*;

use tranche_pool_contracts::claim_token::{ClaimToken, ClaimTokenInitArgs};
use tranche_pool_contracts::splitter::{TrancheSplitter, TrancheSplitterInitArgs};
use tranche_pool_contracts::types::ScheduleConfig;
use tranche_pool_contracts::venues::{
    CompoundingMarket, CompoundingMarketInitArgs, LendingPool, LendingPoolInitArgs,
};

/// Read an optional u64 override from the environment
fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn schedule_from_env() -> ScheduleConfig {
    let defaults = ScheduleConfig::default();
    ScheduleConfig {
        issuance_period: env_u64("TRANCHE_ISSUANCE_PERIOD_MS", defaults.issuance_period),
        insurance_period: env_u64("TRANCHE_INSURANCE_PERIOD_MS", defaults.insurance_period),
        divest_period: env_u64("TRANCHE_DIVEST_PERIOD_MS", defaults.divest_period),
        a_claim_period: env_u64("TRANCHE_A_CLAIM_PERIOD_MS", defaults.a_claim_period),
    }
}

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    println!("=== Tranche Pool Livenet Deployment ===");
    println!();

    // Initialize Odra livenet environment
    let env = odra_casper_livenet_env::env();

    // Configure payment amount for deployments/calls (required for Casper 2.0 txs)
    let payment_amount = env_u64("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT", 200_000_000_000);
    env.set_gas(payment_amount);

    let deployer = env.caller();
    println!("Deployer: {:?}", deployer);

    let schedule = schedule_from_env();
    println!(
        "Schedule (ms): issuance={} insurance={} divest={} a_claim={}",
        schedule.issuance_period,
        schedule.insurance_period,
        schedule.divest_period,
        schedule.a_claim_period
    );
    println!();

    // ==================== Phase 1: Tokens ====================
    println!("=== Phase 1: Deploying Tokens ===");
    println!();

    println!("Deploying base asset (ClaimToken)...");
    let mut base_asset = ClaimToken::deploy(
        &env,
        ClaimTokenInitArgs {
            name: String::from("Tranche Test Base"),
            symbol: String::from("TTB"),
            decimals: 9,
        },
    );
    let base_asset_addr = base_asset.address().clone();
    println!("Base asset deployed at: {:?}", base_asset_addr);

    println!("Deploying senior claim token...");
    let mut senior_token = ClaimToken::deploy(
        &env,
        ClaimTokenInitArgs {
            name: String::from("Tranche Senior Claim"),
            symbol: String::from("TRA"),
            decimals: 9,
        },
    );
    let senior_token_addr = senior_token.address().clone();
    println!("Senior token deployed at: {:?}", senior_token_addr);

    println!("Deploying junior claim token...");
    let mut junior_token = ClaimToken::deploy(
        &env,
        ClaimTokenInitArgs {
            name: String::from("Tranche Junior Claim"),
            symbol: String::from("TRB"),
            decimals: 9,
        },
    );
    let junior_token_addr = junior_token.address().clone();
    println!("Junior token deployed at: {:?}", junior_token_addr);

    println!();

    // ==================== Phase 2: Venues ====================
    println!("=== Phase 2: Deploying Venues ===");
    println!();

    println!("Deploying LendingPool (venue X)...");
    let lending_pool = LendingPool::deploy(
        &env,
        LendingPoolInitArgs {
            underlying: base_asset_addr,
        },
    );
    let lending_pool_addr = lending_pool.address().clone();
    println!("LendingPool deployed at: {:?}", lending_pool_addr);

    println!("Deploying CompoundingMarket (venue Y)...");
    let market = CompoundingMarket::deploy(
        &env,
        CompoundingMarketInitArgs {
            underlying: base_asset_addr,
        },
    );
    let market_addr = market.address().clone();
    println!("CompoundingMarket deployed at: {:?}", market_addr);

    println!();

    // ==================== Phase 3: Splitter ====================
    println!("=== Phase 3: Deploying TrancheSplitter ===");
    println!();

    let splitter = TrancheSplitter::deploy(
        &env,
        TrancheSplitterInitArgs {
            base_asset: base_asset_addr,
            senior_token: senior_token_addr,
            junior_token: junior_token_addr,
            venue_x: lending_pool_addr,
            venue_y: market_addr,
            config: schedule,
        },
    );
    let splitter_addr = splitter.address().clone();
    println!("TrancheSplitter deployed at: {:?}", splitter_addr);

    let deadlines = splitter.get_schedule();
    println!(
        "Deadlines: S={} T1={} T2={} T3={}",
        deadlines.issuance_deadline,
        deadlines.insurance_deadline,
        deadlines.a_claim_open,
        deadlines.b_claim_open
    );

    println!();

    // ==================== Phase 4: Configuration ====================
    println!("=== Phase 4: Cross-contract Configuration ===");
    println!();

    println!("Granting splitter minter role on claim tokens...");
    senior_token.add_minter(splitter_addr);
    junior_token.add_minter(splitter_addr);
    println!("Done.");

    let test_supply = env_u64("TRANCHE_TEST_SUPPLY", 0);
    if test_supply > 0 {
        println!("Minting {} test base asset to deployer...", test_supply);
        base_asset.add_minter(deployer);
        base_asset.mint(deployer, U256::from(test_supply));
        println!("Done.");
    }

    println!();
    println!("=== Deployment Complete ===");
    println!();
    println!("Contract Addresses:");
    println!("  BaseAsset:          {:?}", base_asset_addr);
    println!("  SeniorToken:        {:?}", senior_token_addr);
    println!("  JuniorToken:        {:?}", junior_token_addr);
    println!("  LendingPool:        {:?}", lending_pool_addr);
    println!("  CompoundingMarket:  {:?}", market_addr);
    println!("  TrancheSplitter:    {:?}", splitter_addr);
}
