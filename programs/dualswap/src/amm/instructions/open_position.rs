use crate::amm::state::{AmmPosition, ConstantProductPool, FeePreference};
use crate::constants::seeds;
use anchor_lang::prelude::*;

/// Open an LP position on a constant-product pool
#[derive(Accounts)]
pub struct OpenAmmPosition<'info> {
    pub pool: Account<'info, ConstantProductPool>,

    /// The position record, one per (pool, owner)
    #[account(
        init,
        payer = owner,
        space = AmmPosition::LEN,
        seeds = [
            seeds::AMM_POSITION_SEED,
            pool.key().as_ref(),
            owner.key().as_ref(),
        ],
        bump
    )]
    pub position: Account<'info, AmmPosition>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Open position handler
pub fn handler(ctx: Context<OpenAmmPosition>, fee_preference: FeePreference) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let position = &mut ctx.accounts.position;

    position.pool = pool.key();
    position.owner = ctx.accounts.owner.key();
    position.lp_amount = 0;
    // Snapshot current growth so the position earns nothing retroactively.
    position.fee_growth_snapshot_a = pool.fee_growth_per_lp_a;
    position.fee_growth_snapshot_b = pool.fee_growth_per_lp_b;
    position.fee_preference = fee_preference;
    position.bump = ctx.bumps.position;

    Ok(())
}
