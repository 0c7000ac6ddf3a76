use crate::constants::seeds;
use crate::dlmm::state::{DiscretizedPool, RangePosition};
use crate::errors::DualswapError;
use crate::events::DlmmPositionBurned;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, close_account, Burn, CloseAccount, Mint, TokenAccount, TokenInterface,
};

/// Burn an emptied range position: destroy the position token, close its
/// token account, and reclaim the position account's rent.
#[derive(Accounts)]
pub struct BurnEmptyDlmmPosition<'info> {
    pub pool: Account<'info, DiscretizedPool>,

    #[account(
        mut,
        close = owner,
        seeds = [seeds::POSITION_SEED, position.position_mint.as_ref()],
        bump = position.bump,
        constraint = position.pool == pool.key() @ DualswapError::InvalidPool,
        constraint = position.liquidity_per_bin == 0 @ DualswapError::PositionNotEmpty,
    )]
    pub position: Account<'info, RangePosition>,

    #[account(
        mut,
        constraint = position_mint.key() == position.position_mint
            @ DualswapError::InvalidMint,
    )]
    pub position_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = position_token_account.mint == position.position_mint
            @ DualswapError::InvalidMint,
        constraint = position_token_account.owner == owner.key()
            @ DualswapError::Unauthorized,
        constraint = position_token_account.amount == 1 @ DualswapError::Unauthorized,
    )]
    pub position_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Burn position handler
pub fn handler(ctx: Context<BurnEmptyDlmmPosition>) -> Result<()> {
    burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.position_mint.to_account_info(),
                from: ctx.accounts.position_token_account.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        ),
        1,
    )?;

    close_account(CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        CloseAccount {
            account: ctx.accounts.position_token_account.to_account_info(),
            destination: ctx.accounts.owner.to_account_info(),
            authority: ctx.accounts.owner.to_account_info(),
        },
    ))?;

    emit!(DlmmPositionBurned {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        position: ctx.accounts.position.key(),
    });

    Ok(())
}
