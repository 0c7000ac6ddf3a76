use crate::constants::{
    seeds, BASIS_POINT_MAX, DYNAMIC_BASE_FEE_BPS, DYNAMIC_FEE_CAP_BPS, FEE_UPDATE_COOLDOWN_SECS,
};
use crate::dlmm::state::{DiscretizedPool, PoolType};
use crate::errors::DualswapError;
use crate::events::DlmmFeesUpdated;
use crate::state::ProtocolConfig;
use anchor_lang::prelude::*;

/// Set an official pool's swap fee. Authority-gated on both the protocol
/// config and the pool.
///
/// With an explicit rate the fee is set directly, bypassing the cooldown.
/// Without one the fee is recomputed from recent volatility: the base rate
/// plus a capped surcharge derived from bins crossed per unit time since the
/// last update. The accumulator resets either way.
#[derive(Accounts)]
pub struct UpdateDlmmFees<'info> {
    #[account(
        seeds = [seeds::PROTOCOL_SEED],
        bump = protocol_config.bump,
        has_one = authority @ DualswapError::Unauthorized,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [
            seeds::DLMM_POOL_SEED,
            pool.mint_a.as_ref(),
            pool.mint_b.as_ref(),
            &pool.bin_step.to_le_bytes(),
        ],
        bump = pool.bump,
        constraint = pool.pool_type == PoolType::Official @ DualswapError::InvalidPool,
        constraint = pool.authority == authority.key() @ DualswapError::Unauthorized,
    )]
    pub pool: Account<'info, DiscretizedPool>,

    pub authority: Signer<'info>,
}

/// Computed fee for the elapsed window; pure so it is testable off-chain.
pub fn dynamic_fee_rate(volatility_accumulator: u64, elapsed_secs: i64) -> Result<u16> {
    require!(
        elapsed_secs >= FEE_UPDATE_COOLDOWN_SECS,
        DualswapError::UpdateNotNeeded
    );
    // Bins crossed per hundred seconds, capped at the surcharge ceiling.
    let volatility_bps = volatility_accumulator
        .checked_mul(100)
        .ok_or(DualswapError::MathOverflow)?
        / (elapsed_secs as u64);
    let surcharge = volatility_bps.min(DYNAMIC_FEE_CAP_BPS as u64) as u16;
    Ok(DYNAMIC_BASE_FEE_BPS + surcharge)
}

/// An explicit rate wins over the volatility controller and skips the
/// cooldown; only its bounds are checked.
pub fn resolved_fee_rate(
    requested: Option<u16>,
    volatility_accumulator: u64,
    elapsed_secs: i64,
) -> Result<u16> {
    match requested {
        Some(rate) => {
            require!(
                (rate as u128) < BASIS_POINT_MAX,
                DualswapError::InvalidFeeRates
            );
            Ok(rate)
        }
        None => dynamic_fee_rate(volatility_accumulator, elapsed_secs),
    }
}

/// Update DLMM fees handler
pub fn handler(ctx: Context<UpdateDlmmFees>, new_fee_rate: Option<u16>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let pool = &mut ctx.accounts.pool;

    let elapsed = now
        .checked_sub(pool.last_fee_update_timestamp)
        .ok_or(DualswapError::MathOverflow)?;
    let new_fee_rate = resolved_fee_rate(new_fee_rate, pool.volatility_accumulator, elapsed)?;

    pool.fee_rate = new_fee_rate;
    pool.volatility_accumulator = 0;
    pool.last_fee_update_timestamp = now;

    emit!(DlmmFeesUpdated {
        pool: pool.key(),
        new_fee_rate,
    });

    msg!("DLMM fee rate set to {} bps", new_fee_rate);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_fee_floor_when_calm() {
        // No bins crossed in an hour: base fee only.
        assert_eq!(dynamic_fee_rate(0, 3_600).unwrap(), DYNAMIC_BASE_FEE_BPS);
    }

    #[test]
    fn test_dynamic_fee_scales_with_volatility() {
        // 720 crossings over an hour -> 20 bps surcharge.
        assert_eq!(
            dynamic_fee_rate(720, 3_600).unwrap(),
            DYNAMIC_BASE_FEE_BPS + 20
        );
    }

    #[test]
    fn test_dynamic_fee_capped() {
        assert_eq!(
            dynamic_fee_rate(1_000_000, 3_600).unwrap(),
            DYNAMIC_BASE_FEE_BPS + DYNAMIC_FEE_CAP_BPS
        );
    }

    #[test]
    fn test_cooldown_enforced() {
        assert!(dynamic_fee_rate(100, FEE_UPDATE_COOLDOWN_SECS - 1).is_err());
    }

    #[test]
    fn test_explicit_rate_skips_cooldown() {
        // A manual rate applies even right after the last update.
        assert_eq!(resolved_fee_rate(Some(45), 1_000, 0).unwrap(), 45);
    }

    #[test]
    fn test_explicit_rate_bounds_checked() {
        assert!(resolved_fee_rate(Some(10_000), 0, 3_600).is_err());
        assert_eq!(resolved_fee_rate(Some(9_999), 0, 3_600).unwrap(), 9_999);
    }

    #[test]
    fn test_no_rate_falls_back_to_controller() {
        assert_eq!(
            resolved_fee_rate(None, 0, 3_600).unwrap(),
            DYNAMIC_BASE_FEE_BPS
        );
        assert!(resolved_fee_rate(None, 0, FEE_UPDATE_COOLDOWN_SECS - 1).is_err());
    }
}
