use crate::constants::seeds;
use crate::state::ProtocolConfig;
use anchor_lang::prelude::*;

/// Initialize the singleton protocol config. Runs once; the payer becomes
/// the protocol authority.
#[derive(Accounts)]
pub struct InitializeProtocol<'info> {
    #[account(
        init,
        payer = authority,
        space = ProtocolConfig::LEN,
        seeds = [seeds::PROTOCOL_SEED],
        bump
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Initialize protocol handler
pub fn handler(ctx: Context<InitializeProtocol>) -> Result<()> {
    let config = &mut ctx.accounts.protocol_config;
    config.authority = ctx.accounts.authority.key();
    config.bump = ctx.bumps.protocol_config;

    msg!("Protocol initialized, authority {}", config.authority);

    Ok(())
}
