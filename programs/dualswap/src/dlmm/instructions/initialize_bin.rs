use crate::constants::seeds;
use crate::dlmm::state::{Bin, DiscretizedPool};
use crate::errors::DualswapError;
use anchor_lang::prelude::*;

/// Initialize one bin account for a discretized pool. Bins are created
/// lazily; liquidity operations require their bins to exist beforehand.
#[derive(Accounts)]
#[instruction(bin_id: i32)]
pub struct InitializeBin<'info> {
    pub pool: Account<'info, DiscretizedPool>,

    /// The bin account to create (zero-copy)
    #[account(
        init,
        payer = payer,
        space = Bin::LEN,
        seeds = [
            seeds::BIN_SEED,
            pool.key().as_ref(),
            &bin_id.to_le_bytes(),
        ],
        bump
    )]
    pub bin: AccountLoader<'info, Bin>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Initialize bin handler
pub fn handler(ctx: Context<InitializeBin>, bin_id: i32) -> Result<()> {
    require!(
        bin_id.rem_euclid(ctx.accounts.pool.bin_step as i32) == 0,
        DualswapError::InvalidBinId
    );

    let mut bin = ctx.accounts.bin.load_init()?;
    bin.bin_id = bin_id;
    bin.liquidity = 0;
    bin.fee_growth_per_unit_a = 0;
    bin.fee_growth_per_unit_b = 0;

    Ok(())
}
