use crate::amm::state::ConstantProductPool;
use crate::constants::{seeds, BASIS_POINT_MAX};
use crate::errors::DualswapError;
use crate::events::AmmFeesUpdated;
use crate::state::ProtocolConfig;
use anchor_lang::prelude::*;

/// Set a constant-product pool's swap fee. Authority-gated; passing no rate
/// is rejected rather than silently succeeding.
#[derive(Accounts)]
pub struct UpdateAmmFees<'info> {
    #[account(
        seeds = [seeds::PROTOCOL_SEED],
        bump = protocol_config.bump,
        has_one = authority @ DualswapError::Unauthorized,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [seeds::AMM_POOL_SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, ConstantProductPool>,

    pub authority: Signer<'info>,
}

/// Update AMM fees handler
pub fn handler(ctx: Context<UpdateAmmFees>, new_fee_rate: Option<u16>) -> Result<()> {
    let Some(new_fee_rate) = new_fee_rate else {
        return err!(DualswapError::UpdateNotNeeded);
    };
    require!(
        (new_fee_rate as u128) < BASIS_POINT_MAX,
        DualswapError::InvalidFeeRates
    );

    let now = Clock::get()?.unix_timestamp;
    let pool = &mut ctx.accounts.pool;
    pool.update_oracle(now)?;
    pool.fee_rate = new_fee_rate;
    pool.last_fee_update_timestamp = now;
    // Mark the oracle reading at this change for off-chain fee analysis.
    pool.price_a_cumulative_at_last_fee_update = pool.price_a_cumulative;

    emit!(AmmFeesUpdated {
        pool: pool.key(),
        new_fee_rate,
    });

    msg!("AMM fee rate set to {} bps", new_fee_rate);

    Ok(())
}
