use crate::constants::{ORACLE_PRECISION, PRECISION};
use crate::errors::DualswapError;
use crate::math::mul_div;
use anchor_lang::prelude::*;

/// Constant-product AMM pool state (x * y = k)
/// PDA: ["amm_pool", mint_a, mint_b] with mint_a < mint_b
#[account]
#[derive(Debug, Default)]
pub struct ConstantProductPool {
    /// Bump seed for PDA derivation
    pub bump: u8,

    /// Protocol authority that owns the fee vaults and may update fees
    pub authority: Pubkey,

    // === Mint and vault keys ===
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
    pub lp_mint: Pubkey,

    // === Fee parameters (basis points) ===
    pub fee_rate: u16,
    pub protocol_fee_share: u16,
    pub referrer_fee_share: u16,
    pub protocol_fee_vault_a: Pubkey,
    pub protocol_fee_vault_b: Pubkey,

    // === Liquidity state ===
    pub reserves_a: u64,
    pub reserves_b: u64,

    // === Fee growth accumulators ===
    /// Cumulative token A fees per LP token, scaled by PRECISION.
    /// Monotonic non-decreasing.
    pub fee_growth_per_lp_a: u128,
    /// Cumulative token B fees per LP token, scaled by PRECISION
    pub fee_growth_per_lp_b: u128,

    // === Oracle accumulators ===
    /// Cumulative price of A in B, scaled by ORACLE_PRECISION, times seconds
    pub price_a_cumulative: u128,
    /// Cumulative price of B in A
    pub price_b_cumulative: u128,
    /// Timestamp of the last reserve/oracle update
    pub last_update_timestamp: i64,
    /// Timestamp of the last fee-rate change
    pub last_fee_update_timestamp: i64,
    /// price_a_cumulative at the last fee-rate change.
    /// Reserved for a volatility-linked fee adjustment; nothing reads it yet.
    pub price_a_cumulative_at_last_fee_update: u128,
}

impl ConstantProductPool {
    pub const LEN: usize = 8 +  // discriminator
        1 +                      // bump
        32 +                     // authority
        32 * 5 +                 // mints, vaults, lp_mint
        2 * 3 +                  // fee_rate, protocol_fee_share, referrer_fee_share
        32 * 2 +                 // protocol fee vaults
        8 * 2 +                  // reserves
        16 * 2 +                 // fee growth accumulators
        16 * 2 +                 // price accumulators
        8 * 2 +                  // timestamps
        16; // price snapshot at last fee update

    /// Advance the cumulative price accumulators by the time elapsed since
    /// the last update. Called before every reserve-changing operation so
    /// the accumulators always reflect the pre-trade price.
    pub fn update_oracle(&mut self, now: i64) -> Result<()> {
        if self.last_update_timestamp == 0 {
            self.last_update_timestamp = now;
            return Ok(());
        }

        let elapsed = now
            .checked_sub(self.last_update_timestamp)
            .ok_or(DualswapError::MathOverflow)?;

        if elapsed > 0 && self.reserves_a > 0 && self.reserves_b > 0 {
            let price_a = mul_div(
                self.reserves_b as u128,
                ORACLE_PRECISION,
                self.reserves_a as u128,
            )?;
            self.price_a_cumulative = self
                .price_a_cumulative
                .checked_add(
                    price_a
                        .checked_mul(elapsed as u128)
                        .ok_or(DualswapError::MathOverflow)?,
                )
                .ok_or(DualswapError::MathOverflow)?;

            let price_b = mul_div(
                self.reserves_a as u128,
                ORACLE_PRECISION,
                self.reserves_b as u128,
            )?;
            self.price_b_cumulative = self
                .price_b_cumulative
                .checked_add(
                    price_b
                        .checked_mul(elapsed as u128)
                        .ok_or(DualswapError::MathOverflow)?,
                )
                .ok_or(DualswapError::MathOverflow)?;
        }

        self.last_update_timestamp = now;
        Ok(())
    }

    /// Fold an LP fee into the per-LP-token fee growth accumulator for one
    /// side of the pair. No-op when the pool has no outstanding LP supply.
    pub fn accrue_lp_fee(&mut self, lp_fee: u64, lp_supply: u64, fee_is_a: bool) -> Result<()> {
        if lp_supply == 0 || lp_fee == 0 {
            return Ok(());
        }
        let growth = mul_div(lp_fee as u128, PRECISION, lp_supply as u128)?;
        let accumulator = if fee_is_a {
            &mut self.fee_growth_per_lp_a
        } else {
            &mut self.fee_growth_per_lp_b
        };
        *accumulator = accumulator
            .checked_add(growth)
            .ok_or(DualswapError::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with_reserves(a: u64, b: u64) -> ConstantProductPool {
        ConstantProductPool {
            reserves_a: a,
            reserves_b: b,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_oracle_update_only_stamps_time() {
        let mut pool = pool_with_reserves(1_000, 2_000);
        pool.update_oracle(100).unwrap();
        assert_eq!(pool.last_update_timestamp, 100);
        assert_eq!(pool.price_a_cumulative, 0);
        assert_eq!(pool.price_b_cumulative, 0);
    }

    #[test]
    fn test_oracle_accumulates_price_times_elapsed() {
        let mut pool = pool_with_reserves(1_000, 2_000);
        pool.update_oracle(100).unwrap();
        pool.update_oracle(110).unwrap();
        // price of A in B = 2.0, over 10 seconds
        assert_eq!(pool.price_a_cumulative, 2 * ORACLE_PRECISION * 10);
        // price of B in A = 0.5
        assert_eq!(pool.price_b_cumulative, ORACLE_PRECISION / 2 * 10);
    }

    #[test]
    fn test_oracle_skips_empty_pool() {
        let mut pool = pool_with_reserves(0, 0);
        pool.update_oracle(100).unwrap();
        pool.update_oracle(200).unwrap();
        assert_eq!(pool.price_a_cumulative, 0);
        assert_eq!(pool.last_update_timestamp, 200);
    }

    #[test]
    fn test_accrue_lp_fee_monotonic() {
        let mut pool = pool_with_reserves(1_000, 1_000);
        pool.accrue_lp_fee(500, 1_000, true).unwrap();
        let after_first = pool.fee_growth_per_lp_a;
        assert_eq!(after_first, 500 * PRECISION / 1_000);
        pool.accrue_lp_fee(250, 1_000, true).unwrap();
        assert!(pool.fee_growth_per_lp_a > after_first);
        assert_eq!(pool.fee_growth_per_lp_b, 0);
    }

    #[test]
    fn test_accrue_lp_fee_without_supply_is_noop() {
        let mut pool = pool_with_reserves(1_000, 1_000);
        pool.accrue_lp_fee(500, 0, true).unwrap();
        assert_eq!(pool.fee_growth_per_lp_a, 0);
    }
}
