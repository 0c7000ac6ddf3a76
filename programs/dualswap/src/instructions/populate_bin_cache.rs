use crate::constants::{seeds, MAX_CACHED_BINS};
use crate::errors::DualswapError;
use crate::state::TransactionBinCache;
use anchor_lang::prelude::*;

/// Register the ordered bin working set for the caller's next bin-touching
/// operation. Repopulating overwrites any previous set.
#[derive(Accounts)]
pub struct PopulateBinCache<'info> {
    #[account(
        init_if_needed,
        payer = owner,
        space = TransactionBinCache::LEN,
        seeds = [seeds::BIN_CACHE_SEED, owner.key().as_ref()],
        bump
    )]
    pub bin_cache: Account<'info, TransactionBinCache>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Populate bin cache handler
pub fn handler(ctx: Context<PopulateBinCache>, bins: Vec<Pubkey>) -> Result<()> {
    require!(!bins.is_empty(), DualswapError::InvalidBinCount);
    require!(bins.len() <= MAX_CACHED_BINS, DualswapError::InvalidBinCount);

    let cache = &mut ctx.accounts.bin_cache;
    cache.owner = ctx.accounts.owner.key();
    cache.bins = bins;
    cache.bump = ctx.bumps.bin_cache;

    Ok(())
}
