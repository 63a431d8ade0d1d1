//! Reference yield venues.
//!
//! Share-based vaults over a CEP-18 underlying, used for testnet
//! deployments and end-to-end tests. Receipts are shares; their value is
//! `total_assets / total_shares`. The admin moves `total_assets` to model
//! accrued yield or realized loss.
//!
//! - `LendingPool` (venue X): reverts on failure, withdraw returns the
//!   amount paid out
//! - `CompoundingMarket` (venue Y): mint/redeem never revert on business
//!   failures and report a status code instead

use odra::prelude::*;
use odra::casper_types::U256;
use crate::adapters::Cep18Handle;
use crate::errors::TrancheError;

/// Compounding market status codes
pub const STATUS_OK: u32 = 0;
pub const STATUS_PAUSED: u32 = 1;
pub const STATUS_INVALID_AMOUNT: u32 = 2;
pub const STATUS_INSUFFICIENT_RECEIPTS: u32 = 3;
pub const STATUS_INSUFFICIENT_CASH: u32 = 4;

/// shares = assets * total_shares / total_assets (1:1 while empty)
pub fn to_shares(assets: U256, total_assets: U256, total_shares: U256) -> U256 {
    if total_shares.is_zero() {
        return assets;
    }
    if total_assets.is_zero() {
        return U256::zero();
    }
    assets * total_shares / total_assets
}

/// assets = shares * total_assets / total_shares
pub fn to_assets(shares: U256, total_assets: U256, total_shares: U256) -> U256 {
    if total_shares.is_zero() {
        return shares;
    }
    shares * total_assets / total_shares
}

/// Lending pool (venue X)
#[odra::module]
pub struct LendingPool {
    underlying: Var<Address>,
    admin: Var<Address>,
    total_assets: Var<U256>,
    total_shares: Var<U256>,
    balances: Mapping<Address, U256>,
}

#[odra::module]
impl LendingPool {
    pub fn init(&mut self, underlying: Address) {
        let caller = self.env().caller();
        self.underlying.set(underlying);
        self.admin.set(caller);
        self.total_assets.set(U256::zero());
        self.total_shares.set(U256::zero());
    }

    /// Pull `amount` of `asset` from the caller and credit shares
    pub fn deposit(&mut self, asset: Address, amount: U256, on_behalf_of: Address) {
        let underlying = self.require_underlying(asset);
        if amount.is_zero() {
            self.env().revert(TrancheError::InvalidAmount);
        }

        let shares = to_shares(amount, self.total_assets(), self.total_supply());
        if shares.is_zero() {
            self.env().revert(TrancheError::InvalidAmount);
        }

        let caller = self.env().caller();
        let env = self.env();
        if !Cep18Handle::new(&env, underlying).transfer_from(caller, env.self_address(), amount) {
            self.env().revert(TrancheError::TokenTransferFailed);
        }

        self.total_assets.set(self.total_assets() + amount);
        self.mint_internal(on_behalf_of, shares);
    }

    /// Burn `amount` shares from the caller and pay their value to `to`
    pub fn withdraw(&mut self, asset: Address, amount: U256, to: Address) -> U256 {
        let underlying = self.require_underlying(asset);
        if amount.is_zero() {
            self.env().revert(TrancheError::InvalidAmount);
        }

        let caller = self.env().caller();
        let paid = to_assets(amount, self.total_assets(), self.total_supply());
        self.burn_internal(caller, amount);
        self.total_assets.set(self.total_assets().saturating_sub(paid));

        if !paid.is_zero() && !Cep18Handle::new(&self.env(), underlying).transfer(to, paid) {
            self.env().revert(TrancheError::TokenTransferFailed);
        }
        paid
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.balances.get(&address).unwrap_or(U256::zero())
    }

    pub fn total_supply(&self) -> U256 {
        self.total_shares.get().unwrap_or(U256::zero())
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        let sender_balance = self.balance_of(sender);
        if sender_balance < amount {
            self.env().revert(TrancheError::InsufficientBalance);
        }
        self.balances.set(&sender, sender_balance - amount);
        self.balances.set(&recipient, self.balance_of(recipient) + amount);
        true
    }

    pub fn total_assets(&self) -> U256 {
        self.total_assets.get().unwrap_or(U256::zero())
    }

    /// Override the asset valuation (admin only)
    pub fn set_total_assets(&mut self, total_assets: U256) {
        self.require_admin();
        self.total_assets.set(total_assets);
    }

    pub fn get_underlying(&self) -> Option<Address> {
        self.underlying.get()
    }

    fn mint_internal(&mut self, to: Address, shares: U256) {
        self.balances.set(&to, self.balance_of(to) + shares);
        self.total_shares.set(self.total_supply() + shares);
    }

    fn burn_internal(&mut self, from: Address, shares: U256) {
        let balance = self.balance_of(from);
        if balance < shares {
            self.env().revert(TrancheError::InsufficientBalance);
        }
        self.balances.set(&from, balance - shares);
        self.total_shares.set(self.total_supply() - shares);
    }

    fn require_underlying(&self, asset: Address) -> Address {
        match self.underlying.get() {
            Some(underlying) if underlying == asset => underlying,
            _ => self.env().revert(TrancheError::InvalidConfig),
        }
    }

    fn require_admin(&self) {
        let caller = self.env().caller();
        if self.admin.get() != Some(caller) {
            self.env().revert(TrancheError::Unauthorized);
        }
    }
}

/// Compounding market (venue Y)
#[odra::module]
pub struct CompoundingMarket {
    underlying: Var<Address>,
    admin: Var<Address>,
    total_assets: Var<U256>,
    total_shares: Var<U256>,
    balances: Mapping<Address, U256>,
    paused: Var<bool>,
}

#[odra::module]
impl CompoundingMarket {
    pub fn init(&mut self, underlying: Address) {
        let caller = self.env().caller();
        self.underlying.set(underlying);
        self.admin.set(caller);
        self.total_assets.set(U256::zero());
        self.total_shares.set(U256::zero());
        self.paused.set(false);
    }

    /// Pull `amount` underlying from the caller and mint receipts
    pub fn mint(&mut self, amount: U256) -> u32 {
        if self.is_paused() {
            return STATUS_PAUSED;
        }
        let shares = to_shares(amount, self.total_assets(), self.total_supply());
        if amount.is_zero() || shares.is_zero() {
            return STATUS_INVALID_AMOUNT;
        }

        let caller = self.env().caller();
        let env = self.env();
        if !Cep18Handle::new(&env, self.underlying()).transfer_from(caller, env.self_address(), amount) {
            self.env().revert(TrancheError::TokenTransferFailed);
        }

        self.total_assets.set(self.total_assets() + amount);
        self.balances.set(&caller, self.balance_of(caller) + shares);
        self.total_shares.set(self.total_supply() + shares);
        STATUS_OK
    }

    /// Burn `amount` receipts from the caller and pay out their value
    pub fn redeem(&mut self, amount: U256) -> u32 {
        if self.is_paused() {
            return STATUS_PAUSED;
        }
        if amount.is_zero() {
            return STATUS_INVALID_AMOUNT;
        }

        let caller = self.env().caller();
        let balance = self.balance_of(caller);
        if balance < amount {
            return STATUS_INSUFFICIENT_RECEIPTS;
        }

        let env = self.env();
        let underlying = Cep18Handle::new(&env, self.underlying());
        let paid = to_assets(amount, self.total_assets(), self.total_supply());
        if underlying.balance_of(env.self_address()) < paid {
            return STATUS_INSUFFICIENT_CASH;
        }

        self.balances.set(&caller, balance - amount);
        self.total_shares.set(self.total_supply() - amount);
        self.total_assets.set(self.total_assets().saturating_sub(paid));

        if !paid.is_zero() && !underlying.transfer(caller, paid) {
            self.env().revert(TrancheError::TokenTransferFailed);
        }
        STATUS_OK
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.balances.get(&address).unwrap_or(U256::zero())
    }

    pub fn total_supply(&self) -> U256 {
        self.total_shares.get().unwrap_or(U256::zero())
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        let sender_balance = self.balance_of(sender);
        if sender_balance < amount {
            self.env().revert(TrancheError::InsufficientBalance);
        }
        self.balances.set(&sender, sender_balance - amount);
        self.balances.set(&recipient, self.balance_of(recipient) + amount);
        true
    }

    pub fn total_assets(&self) -> U256 {
        self.total_assets.get().unwrap_or(U256::zero())
    }

    /// Override the asset valuation (admin only)
    pub fn set_total_assets(&mut self, total_assets: U256) {
        self.require_admin();
        self.total_assets.set(total_assets);
    }

    /// Pause mint and redeem (admin only)
    pub fn set_paused(&mut self, paused: bool) {
        self.require_admin();
        self.paused.set(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get_or_default()
    }

    pub fn get_underlying(&self) -> Option<Address> {
        self.underlying.get()
    }

    fn underlying(&self) -> Address {
        match self.underlying.get() {
            Some(underlying) => underlying,
            None => self.env().revert(TrancheError::NotConfigured),
        }
    }

    fn require_admin(&self) {
        let caller = self.env().caller();
        if self.admin.get() != Some(caller) {
            self.env().revert(TrancheError::Unauthorized);
        }
    }
}
