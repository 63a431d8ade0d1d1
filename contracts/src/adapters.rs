//! Cross-contract adapters.
//!
//! Bind the engine's collaborator traits to deployed contracts:
//! - `ClaimTokens`: the senior and junior `ClaimToken` instances
//! - `PoolAsset`: the base asset (any CEP-18) held by the splitter
//! - `LendingVenue`: venue X, withdraw returns the amount paid
//! - `CompoundingVenue`: venue Y, mint/redeem return a status code
//!
//! Every call goes through `CallDef` so the adapters work against any
//! contract exposing the expected entry points.

use odra::prelude::*;
use odra::casper_types::{U256, RuntimeArgs, runtime_args};
use odra::{CallDef, ContractEnv};
use crate::errors::TrancheError;
use crate::interfaces::{BaseAsset, ClaimLedger, PoolResult, YieldVenue};
use crate::types::TrancheClass;

/// Status code reported by a compounding venue on success
pub const VENUE_STATUS_OK: u32 = 0;

/// Handle to a CEP-18 token
pub struct Cep18Handle<'a> {
    env: &'a ContractEnv,
    token: Address,
}

impl<'a> Cep18Handle<'a> {
    pub fn new(env: &'a ContractEnv, token: Address) -> Self {
        Self { env, token }
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        let args = runtime_args! {
            "address" => address
        };
        let call_def = CallDef::new("balance_of", false, args);
        self.env.call_contract(self.token, call_def)
    }

    pub fn transfer(&self, recipient: Address, amount: U256) -> bool {
        let args = runtime_args! {
            "recipient" => recipient,
            "amount" => amount
        };
        let call_def = CallDef::new("transfer", true, args);
        self.env.call_contract(self.token, call_def)
    }

    pub fn transfer_from(&self, owner: Address, recipient: Address, amount: U256) -> bool {
        let args = runtime_args! {
            "owner" => owner,
            "recipient" => recipient,
            "amount" => amount
        };
        let call_def = CallDef::new("transfer_from", true, args);
        self.env.call_contract(self.token, call_def)
    }

    pub fn approve(&self, spender: Address, amount: U256) -> bool {
        let args = runtime_args! {
            "spender" => spender,
            "amount" => amount
        };
        let call_def = CallDef::new("approve", true, args);
        self.env.call_contract(self.token, call_def)
    }
}

/// Base asset held in the custody of `custody`
pub struct PoolAsset<'a> {
    token: Cep18Handle<'a>,
    custody: Address,
}

impl<'a> PoolAsset<'a> {
    pub fn new(env: &'a ContractEnv, token: Address, custody: Address) -> Self {
        Self {
            token: Cep18Handle::new(env, token),
            custody,
        }
    }
}

impl BaseAsset for PoolAsset<'_> {
    fn balance(&self) -> U256 {
        self.token.balance_of(self.custody)
    }

    fn pull(&mut self, from: Address, amount: U256) -> PoolResult<()> {
        if !self.token.transfer_from(from, self.custody, amount) {
            return Err(TrancheError::TokenTransferFailed);
        }
        Ok(())
    }

    fn push(&mut self, to: Address, amount: U256) -> PoolResult<()> {
        if !self.token.transfer(to, amount) {
            return Err(TrancheError::TokenTransferFailed);
        }
        Ok(())
    }
}

/// The two claim token contracts
pub struct ClaimTokens<'a> {
    env: &'a ContractEnv,
    senior: Address,
    junior: Address,
}

impl<'a> ClaimTokens<'a> {
    pub fn new(env: &'a ContractEnv, senior: Address, junior: Address) -> Self {
        Self { env, senior, junior }
    }

    fn token(&self, class: TrancheClass) -> Address {
        match class {
            TrancheClass::Senior => self.senior,
            TrancheClass::Junior => self.junior,
        }
    }
}

impl ClaimLedger for ClaimTokens<'_> {
    fn mint(&mut self, class: TrancheClass, to: Address, amount: U256) {
        let args = runtime_args! {
            "to" => to,
            "amount" => amount
        };
        let call_def = CallDef::new("mint", true, args);
        self.env.call_contract::<()>(self.token(class), call_def);
    }

    fn burn(&mut self, class: TrancheClass, from: Address, amount: U256) {
        let args = runtime_args! {
            "owner" => from,
            "amount" => amount
        };
        let call_def = CallDef::new("burn_from", true, args);
        self.env.call_contract::<()>(self.token(class), call_def);
    }

    fn balance_of(&self, class: TrancheClass, owner: Address) -> U256 {
        Cep18Handle::new(self.env, self.token(class)).balance_of(owner)
    }

    fn total_supply(&self, class: TrancheClass) -> U256 {
        let call_def = CallDef::new("total_supply", false, RuntimeArgs::new());
        self.env.call_contract(self.token(class), call_def)
    }
}

/// Venue X: `deposit(asset, amount, on_behalf_of)` and
/// `withdraw(asset, amount, to) -> U256`
pub struct LendingVenue<'a> {
    env: &'a ContractEnv,
    venue: Address,
    asset: Address,
    custody: Address,
}

impl<'a> LendingVenue<'a> {
    pub fn new(env: &'a ContractEnv, venue: Address, asset: Address, custody: Address) -> Self {
        Self {
            env,
            venue,
            asset,
            custody,
        }
    }
}

impl YieldVenue for LendingVenue<'_> {
    fn receipt_balance(&self) -> U256 {
        Cep18Handle::new(self.env, self.venue).balance_of(self.custody)
    }

    fn deposit(&mut self, amount: U256) -> PoolResult<()> {
        if !Cep18Handle::new(self.env, self.asset).approve(self.venue, amount) {
            return Err(TrancheError::VenueOperationFailed);
        }
        let args = runtime_args! {
            "asset" => self.asset,
            "amount" => amount,
            "on_behalf_of" => self.custody
        };
        let call_def = CallDef::new("deposit", true, args);
        self.env.call_contract::<()>(self.venue, call_def);
        Ok(())
    }

    fn withdraw(&mut self, receipts: U256) -> PoolResult<()> {
        let args = runtime_args! {
            "asset" => self.asset,
            "amount" => receipts,
            "to" => self.custody
        };
        let call_def = CallDef::new("withdraw", true, args);
        // Paid amount is measured from the custody balance by the engine
        self.env.call_contract::<U256>(self.venue, call_def);
        Ok(())
    }

    fn transfer_receipts(&mut self, to: Address, amount: U256) -> PoolResult<()> {
        if !Cep18Handle::new(self.env, self.venue).transfer(to, amount) {
            return Err(TrancheError::TokenTransferFailed);
        }
        Ok(())
    }
}

/// Venue Y: `mint(amount) -> u32` and `redeem(amount) -> u32`
pub struct CompoundingVenue<'a> {
    env: &'a ContractEnv,
    venue: Address,
    asset: Address,
    custody: Address,
}

impl<'a> CompoundingVenue<'a> {
    pub fn new(env: &'a ContractEnv, venue: Address, asset: Address, custody: Address) -> Self {
        Self {
            env,
            venue,
            asset,
            custody,
        }
    }
}

impl YieldVenue for CompoundingVenue<'_> {
    fn receipt_balance(&self) -> U256 {
        Cep18Handle::new(self.env, self.venue).balance_of(self.custody)
    }

    fn deposit(&mut self, amount: U256) -> PoolResult<()> {
        if !Cep18Handle::new(self.env, self.asset).approve(self.venue, amount) {
            return Err(TrancheError::VenueOperationFailed);
        }
        let args = runtime_args! {
            "amount" => amount
        };
        let call_def = CallDef::new("mint", true, args);
        let status: u32 = self.env.call_contract(self.venue, call_def);
        if status != VENUE_STATUS_OK {
            return Err(TrancheError::VenueOperationFailed);
        }
        Ok(())
    }

    fn withdraw(&mut self, receipts: U256) -> PoolResult<()> {
        let args = runtime_args! {
            "amount" => receipts
        };
        let call_def = CallDef::new("redeem", true, args);
        let status: u32 = self.env.call_contract(self.venue, call_def);
        if status != VENUE_STATUS_OK {
            return Err(TrancheError::VenueRedeemFailed);
        }
        Ok(())
    }

    fn transfer_receipts(&mut self, to: Address, amount: U256) -> PoolResult<()> {
        if !Cep18Handle::new(self.env, self.venue).transfer(to, amount) {
            return Err(TrancheError::TokenTransferFailed);
        }
        Ok(())
    }
}
