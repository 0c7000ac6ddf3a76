//! Constant-product pool math
//!
//! Pure quote functions for deposits, withdrawals, swaps, and lazy fee
//! settlement. All amounts are u64 token units; intermediates widen to u128
//! (or 256 bits via mul_div) and every step is checked.

use crate::constants::{BASIS_POINT_MAX, PRECISION};
use crate::errors::DualswapError;
use crate::math::{integer_sqrt, mul_div, to_u64};
use anchor_lang::prelude::*;

/// Result of a deposit quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositQuote {
    /// Token A actually deposited (ratio-adjusted)
    pub amount_a: u64,
    /// Token B actually deposited
    pub amount_b: u64,
    /// LP tokens to mint for the deposit
    pub lp_to_mint: u64,
}

/// Result of a swap quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Output amount after fees and the constant-product curve
    pub amount_out: u64,
    /// Fee portion routed to the protocol (referrer share is carved out of
    /// this at transfer time)
    pub protocol_fee: u64,
    /// Fee portion left in the pool for LPs
    pub lp_fee: u64,
}

/// Quote a liquidity deposit.
///
/// The first deposit mints the geometric mean of the two amounts; later
/// deposits are clamped to the current reserve ratio and mint LP
/// proportional to the pool share contributed.
pub fn deposit_quote(
    reserves_a: u64,
    reserves_b: u64,
    lp_supply: u64,
    amount_a_desired: u64,
    amount_b_desired: u64,
) -> Result<DepositQuote> {
    if lp_supply == 0 {
        let lp_to_mint = integer_sqrt(
            (amount_a_desired as u128)
                .checked_mul(amount_b_desired as u128)
                .ok_or(DualswapError::MathOverflow)?,
        );
        return Ok(DepositQuote {
            amount_a: amount_a_desired,
            amount_b: amount_b_desired,
            lp_to_mint: to_u64(lp_to_mint)?,
        });
    }

    require!(
        reserves_a > 0 && reserves_b > 0,
        DualswapError::InsufficientLiquidity
    );

    // Clamp to the current price so the deposit does not move reserves.
    let optimal_b = mul_div(
        amount_a_desired as u128,
        reserves_b as u128,
        reserves_a as u128,
    )?;
    let (amount_a, amount_b) = if optimal_b <= amount_b_desired as u128 {
        (amount_a_desired, to_u64(optimal_b)?)
    } else {
        let optimal_a = mul_div(
            amount_b_desired as u128,
            reserves_a as u128,
            reserves_b as u128,
        )?;
        (to_u64(optimal_a)?, amount_b_desired)
    };

    let lp_from_a = mul_div(amount_a as u128, lp_supply as u128, reserves_a as u128)?;
    let lp_from_b = mul_div(amount_b as u128, lp_supply as u128, reserves_b as u128)?;

    Ok(DepositQuote {
        amount_a,
        amount_b,
        lp_to_mint: to_u64(lp_from_a.min(lp_from_b))?,
    })
}

/// Quote a swap against the constant-product curve.
///
/// The fee is taken off the input; only the protocol share (incl. any
/// referrer carve-out) leaves the pool, so the LP share raises k.
pub fn swap_quote(
    amount_in: u64,
    source_reserves: u64,
    destination_reserves: u64,
    fee_rate: u16,
    protocol_fee_share: u16,
) -> Result<SwapQuote> {
    require!(amount_in > 0, DualswapError::ZeroAmount);
    require!(
        source_reserves > 0 && destination_reserves > 0,
        DualswapError::InsufficientLiquidityForSwap
    );

    let total_fee = mul_div(amount_in as u128, fee_rate as u128, BASIS_POINT_MAX)?;
    let protocol_fee = mul_div(total_fee, protocol_fee_share as u128, BASIS_POINT_MAX)?;
    let lp_fee = total_fee
        .checked_sub(protocol_fee)
        .ok_or(DualswapError::MathOverflow)?;

    let amount_in_after_fee = (amount_in as u128)
        .checked_sub(total_fee)
        .ok_or(DualswapError::MathOverflow)?;

    // out = dest * in' / (src + in')
    let denominator = (source_reserves as u128)
        .checked_add(amount_in_after_fee)
        .ok_or(DualswapError::MathOverflow)?;
    let amount_out = mul_div(
        destination_reserves as u128,
        amount_in_after_fee,
        denominator,
    )?;

    Ok(SwapQuote {
        amount_out: to_u64(amount_out)?,
        protocol_fee: to_u64(protocol_fee)?,
        lp_fee: to_u64(lp_fee)?,
    })
}

/// Amounts returned for burning `lp_to_burn` LP tokens.
pub fn withdraw_amounts(
    reserves_a: u64,
    reserves_b: u64,
    lp_supply: u64,
    lp_to_burn: u64,
) -> Result<(u64, u64)> {
    require!(lp_supply > 0, DualswapError::InsufficientLiquidity);

    let amount_a = mul_div(reserves_a as u128, lp_to_burn as u128, lp_supply as u128)?;
    let amount_b = mul_div(reserves_b as u128, lp_to_burn as u128, lp_supply as u128)?;
    Ok((to_u64(amount_a)?, to_u64(amount_b)?))
}

/// Fees owed to a position since its last settlement:
/// (pool growth - snapshot) * lp_amount / PRECISION per asset.
pub fn pending_fees(
    fee_growth_a: u128,
    fee_growth_b: u128,
    snapshot_a: u128,
    snapshot_b: u128,
    lp_amount: u64,
) -> Result<(u64, u64)> {
    let delta_a = fee_growth_a
        .checked_sub(snapshot_a)
        .ok_or(DualswapError::MathOverflow)?;
    let delta_b = fee_growth_b
        .checked_sub(snapshot_b)
        .ok_or(DualswapError::MathOverflow)?;

    let fees_a = mul_div(delta_a, lp_amount as u128, PRECISION)?;
    let fees_b = mul_div(delta_b, lp_amount as u128, PRECISION)?;
    Ok((to_u64(fees_a)?, to_u64(fees_b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_deposit_mints_geometric_mean() {
        let quote = deposit_quote(0, 0, 0, 100, 100).unwrap();
        assert_eq!(quote.lp_to_mint, 100);
        assert_eq!((quote.amount_a, quote.amount_b), (100, 100));

        let quote = deposit_quote(0, 0, 0, 100, 400).unwrap();
        assert_eq!(quote.lp_to_mint, 200);
    }

    #[test]
    fn test_later_deposit_clamps_to_ratio() {
        // Pool at 2:1, user offers 1:1; B should be clamped.
        let quote = deposit_quote(2_000, 1_000, 1_000, 200, 200).unwrap();
        assert_eq!(quote.amount_a, 200);
        assert_eq!(quote.amount_b, 100);
        // 10% of reserves -> 10% of supply
        assert_eq!(quote.lp_to_mint, 100);
    }

    #[test]
    fn test_deposit_zero_amount_mints_zero() {
        let quote = deposit_quote(1_000, 1_000, 1_000, 0, 500).unwrap();
        assert_eq!(quote.lp_to_mint, 0);
    }

    #[test]
    fn test_swap_quote_fee_split() {
        // fee_rate 25 bps, protocol share 20%
        let quote = swap_quote(1_000_000, 100_000_000, 100_000_000, 25, 2_000).unwrap();
        let total_fee = 1_000_000 * 25 / 10_000;
        assert_eq!(quote.protocol_fee + quote.lp_fee, total_fee as u64);
        assert_eq!(quote.protocol_fee, (total_fee / 5) as u64);
        assert!(quote.amount_out > 0);
        assert!(quote.amount_out < 1_000_000);
    }

    #[test]
    fn test_swap_zero_amount_rejected() {
        assert!(swap_quote(0, 1_000, 1_000, 25, 2_000).is_err());
    }

    #[test]
    fn test_swap_empty_pool_rejected() {
        assert!(swap_quote(100, 0, 1_000, 25, 2_000).is_err());
    }

    #[test]
    fn test_withdraw_proportional() {
        let (a, b) = withdraw_amounts(3_000, 900, 300, 100).unwrap();
        assert_eq!((a, b), (1_000, 300));
    }

    #[test]
    fn test_withdraw_without_supply_rejected() {
        assert!(withdraw_amounts(1_000, 1_000, 0, 10).is_err());
    }

    #[test]
    fn test_pending_fees_and_idempotent_settlement() {
        let growth_a = 5 * PRECISION;
        let (fees_a, fees_b) = pending_fees(growth_a, 0, 0, 0, 1_000).unwrap();
        assert_eq!(fees_a, 5_000);
        assert_eq!(fees_b, 0);

        // After settlement the snapshot equals the accumulator; a second
        // claim yields zero.
        let (again_a, again_b) = pending_fees(growth_a, 0, growth_a, 0, 1_000).unwrap();
        assert_eq!((again_a, again_b), (0, 0));
    }

    proptest! {
        /// The product of reserves never decreases across a swap: the LP fee
        /// stays in the pool, so k strictly improves whenever a fee accrues.
        #[test]
        fn prop_constant_product_non_decreasing(
            amount_in in 1u64..1_000_000_000,
            reserves_a in 1_000u64..1_000_000_000_000,
            reserves_b in 1_000u64..1_000_000_000_000,
            fee_rate in 0u16..500,
        ) {
            let quote = swap_quote(amount_in, reserves_a, reserves_b, fee_rate, 2_000).unwrap();
            let new_a = reserves_a as u128 + amount_in as u128 - quote.protocol_fee as u128;
            let new_b = reserves_b as u128 - quote.amount_out as u128;
            let k_before = reserves_a as u128 * reserves_b as u128;
            let k_after = new_a * new_b;
            prop_assert!(k_after >= k_before);
        }

        /// A later deposit never mints more than its proportional share.
        #[test]
        fn prop_deposit_share_bounded(
            reserves_a in 1_000u64..1_000_000_000,
            reserves_b in 1_000u64..1_000_000_000,
            lp_supply in 1_000u64..1_000_000_000,
            amount_a in 1u64..1_000_000_000,
            amount_b in 1u64..1_000_000_000,
        ) {
            let quote = deposit_quote(reserves_a, reserves_b, lp_supply, amount_a, amount_b).unwrap();
            // lp_minted / lp_supply <= amount_a / reserves_a (and same for B)
            prop_assert!(
                quote.lp_to_mint as u128 * reserves_a as u128
                    <= quote.amount_a as u128 * lp_supply as u128
            );
            prop_assert!(
                quote.lp_to_mint as u128 * reserves_b as u128
                    <= quote.amount_b as u128 * lp_supply as u128
            );
        }

        /// Fee growth deltas settle exactly once: claiming after n
        /// accumulator bumps equals the sum of per-bump claims.
        #[test]
        fn prop_deferred_claim_equals_incremental(
            bumps in proptest::collection::vec(1u128..1_000_000, 1..8),
            lp_amount in 1u64..1_000_000,
        ) {
            let mut growth = 0u128;
            let mut incremental_total = 0u64;
            let mut snapshot = 0u128;
            for bump in &bumps {
                growth += bump * PRECISION;
                let (fees, _) = pending_fees(growth, 0, snapshot, 0, lp_amount).unwrap();
                incremental_total += fees;
                snapshot = growth;
            }
            let (deferred, _) = pending_fees(growth, 0, 0, 0, lp_amount).unwrap();
            prop_assert_eq!(deferred, incremental_total);
        }
    }
}
