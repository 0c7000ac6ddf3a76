use anchor_lang::prelude::*;

/// DualSwap Error Codes
///
/// A closed taxonomy: every failure is a locally detected precondition or
/// postcondition violation, and the whole operation rolls back. The variant
/// order is part of the wire format (codes 6000..=6024), so new variants are
/// appended and existing ones never move.
#[error_code]
pub enum DualswapError {
    /// Fee rate or fee share out of range
    #[msg("The provided fee rates are invalid")]
    InvalidFeeRates, // 6000

    /// (bin_step, fee_rate) pair not on the relevant whitelist,
    /// or malformed whitelist input
    #[msg("The provided parameters are not on the whitelist")]
    InvalidParameters, // 6001

    /// Token A mint must sort strictly below token B mint
    #[msg("Token mints are not in canonical order")]
    InvalidMintOrder, // 6002

    /// A supplied mint does not match the pool's stored mint
    #[msg("Token mint mismatch")]
    InvalidMint, // 6003

    /// Lower bin id must be strictly below upper bin id, or a declared
    /// deposit range falls outside the position's range
    #[msg("Invalid bin range")]
    InvalidBinRange, // 6004

    /// Liquidity or deposit amount is zero
    #[msg("Zero liquidity")]
    ZeroLiquidity, // 6005

    /// Execution-time result worse than the caller's minimum
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded, // 6006

    /// Signer is not the required authority or owner
    #[msg("Unauthorized")]
    Unauthorized, // 6007

    /// Withdrawal exceeds the position's balance
    #[msg("Insufficient liquidity")]
    InsufficientLiquidity, // 6008

    /// Burn requires a position with zero liquidity
    #[msg("Position is not empty")]
    PositionNotEmpty, // 6009

    /// Swap input amount is zero
    #[msg("Zero swap amount")]
    ZeroAmount, // 6010

    /// A supplied vault does not match the pool's vault
    #[msg("Invalid vault")]
    InvalidVault, // 6011

    /// Bin id is not a multiple of the pool's bin step
    #[msg("Bin id not aligned to bin step")]
    InvalidBinId, // 6012

    /// Range covers more bins than the allowed maximum
    #[msg("Bin range too wide")]
    RangeTooWide, // 6013

    /// Checked arithmetic overflowed, underflowed, or divided by zero
    #[msg("Math overflow")]
    MathOverflow, // 6014

    /// Bin step is zero or otherwise unusable
    #[msg("Invalid bin step")]
    InvalidBinStep, // 6015

    /// Pool (or declared bin set) cannot support the trade
    #[msg("Insufficient liquidity for swap")]
    InsufficientLiquidityForSwap, // 6016

    /// Number of supplied bins does not match the declared range
    #[msg("Bin count does not match the declared range")]
    InvalidBinCount, // 6017

    /// A bin account's address or owner is not the expected one
    #[msg("Invalid bin account")]
    InvalidBinAccount, // 6018

    /// Position does not belong to the supplied pool
    #[msg("Invalid pool for position")]
    InvalidPool, // 6019

    /// Supplied bin list diverges from the cached list
    #[msg("Supplied bins do not match the cached bin list")]
    BinCacheMismatch, // 6020

    /// Too soon since the last update, or nothing to update
    #[msg("Update not needed")]
    UpdateNotNeeded, // 6021

    /// Operation not permitted under the position's fee preference
    #[msg("Fee preference does not permit this action")]
    InvalidFeePreference, // 6022

    /// Sum of protocol and referrer fee shares exceeds 100%
    #[msg("Combined fee shares exceed 100%")]
    FeeShareExceedsTotal, // 6023

    /// The referrer fee account belongs to the trader
    #[msg("Trader cannot be the referrer")]
    ReferrerIsTrader, // 6024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_order_is_stable() {
        // On-chain codes are 6000 + discriminant.
        assert_eq!(DualswapError::InvalidFeeRates as u32, 0);
        assert_eq!(DualswapError::InvalidBinRange as u32, 4);
        assert_eq!(DualswapError::MathOverflow as u32, 14);
        assert_eq!(DualswapError::BinCacheMismatch as u32, 20);
        assert_eq!(DualswapError::ReferrerIsTrader as u32, 24);
    }
}
