use crate::constants::{seeds, MAX_WHITELIST_ENTRIES};
use crate::errors::DualswapError;
use crate::state::{ParameterWhitelist, PoolParameter, ProtocolConfig};
use anchor_lang::prelude::*;

/// Create the singleton parameter whitelist with its initial lists
#[derive(Accounts)]
pub struct InitializeDlmmParameters<'info> {
    #[account(
        seeds = [seeds::PROTOCOL_SEED],
        bump = protocol_config.bump,
        has_one = authority @ DualswapError::Unauthorized,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        init,
        payer = authority,
        space = ParameterWhitelist::LEN,
        seeds = [seeds::WHITELIST_SEED],
        bump
    )]
    pub whitelist: Account<'info, ParameterWhitelist>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Initialize whitelist handler
pub fn handler(
    ctx: Context<InitializeDlmmParameters>,
    official: Vec<PoolParameter>,
    community: Vec<PoolParameter>,
) -> Result<()> {
    require!(
        official.len() <= MAX_WHITELIST_ENTRIES && community.len() <= MAX_WHITELIST_ENTRIES,
        DualswapError::InvalidParameters
    );
    for param in official.iter().chain(community.iter()) {
        require!(param.bin_step > 0, DualswapError::InvalidBinStep);
        require!(param.fee_rate < 10_000, DualswapError::InvalidFeeRates);
    }

    let whitelist = &mut ctx.accounts.whitelist;
    whitelist.authority = ctx.accounts.authority.key();
    whitelist.official = official;
    whitelist.community = community;
    whitelist.bump = ctx.bumps.whitelist;

    msg!(
        "Parameter whitelist initialized ({} official, {} community)",
        whitelist.official.len(),
        whitelist.community.len()
    );

    Ok(())
}
