//! Protocol error definitions.

use odra::prelude::*;

/// Tranche pool errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TrancheError {
    // Phase errors (1xx)
    PhaseViolation = 100,
    StillInInsurancePeriod = 101,
    DivestNotYetCalled = 102,
    UseClassSpecificClaim = 103,

    // Lifecycle errors (2xx)
    AlreadyPerformed = 200,
    NotInvested = 201,

    // Balance errors (3xx)
    InsufficientBalance = 300,
    InsufficientPoolBalance = 301,

    // Venue errors (4xx)
    VenueOperationFailed = 400,
    VenueRedeemFailed = 401,
    IncompleteRedemption = 402,

    // Request errors (5xx)
    InvalidAmount = 500,

    // Token and configuration errors (6xx)
    TokenTransferFailed = 600,
    Unauthorized = 601,
    InvalidConfig = 602,
    NotConfigured = 603,
}

impl TrancheError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Phase
            TrancheError::PhaseViolation => "Operation not allowed in the current phase",
            TrancheError::StillInInsurancePeriod => "Still in insurance period",
            TrancheError::DivestNotYetCalled => "Divest has not been called yet",
            TrancheError::UseClassSpecificClaim => "Liquid mode never entered: use claim_senior / claim_junior",

            // Lifecycle
            TrancheError::AlreadyPerformed => "Operation already performed",
            TrancheError::NotInvested => "Pool was never invested",

            // Balances
            TrancheError::InsufficientBalance => "Insufficient claim token balance",
            TrancheError::InsufficientPoolBalance => "Insufficient pool balance",

            // Venues
            TrancheError::VenueOperationFailed => "Yield venue operation failed",
            TrancheError::VenueRedeemFailed => "Yield venue redeem returned a failure status",
            TrancheError::IncompleteRedemption => "Venue still reports receipt tokens after divest",

            // Requests
            TrancheError::InvalidAmount => "Invalid amount",

            // Tokens / config
            TrancheError::TokenTransferFailed => "Token transfer failed",
            TrancheError::Unauthorized => "Unauthorized caller",
            TrancheError::InvalidConfig => "Invalid configuration parameter",
            TrancheError::NotConfigured => "Contract address not configured",
        }
    }
}

impl core::fmt::Display for TrancheError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<TrancheError> for OdraError {
    fn from(error: TrancheError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
