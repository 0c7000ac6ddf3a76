use crate::constants::seeds;
use crate::dlmm::math::bins_in_range;
use crate::dlmm::state::{DiscretizedPool, RangePosition};
use crate::events::DlmmPositionOpened;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{mint_to, Mint, MintTo, TokenAccount, TokenInterface};

/// Open an empty range position and mint its supply-1 position token
#[derive(Accounts)]
pub struct OpenDlmmPosition<'info> {
    pub pool: Account<'info, DiscretizedPool>,

    /// The position record, addressed by its mint
    #[account(
        init,
        payer = owner,
        space = RangePosition::LEN,
        seeds = [seeds::POSITION_SEED, position_mint.key().as_ref()],
        bump
    )]
    pub position: Account<'info, RangePosition>,

    /// Fresh supply-1 mint proving ownership of the position
    #[account(
        init,
        payer = owner,
        mint::decimals = 0,
        mint::authority = pool,
        mint::token_program = token_program,
    )]
    pub position_mint: InterfaceAccount<'info, Mint>,

    /// The owner's token account receiving the position token
    #[account(
        init,
        payer = owner,
        token::mint = position_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub position_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Open position handler
pub fn handler(
    ctx: Context<OpenDlmmPosition>,
    lower_bin_id: i32,
    upper_bin_id: i32,
) -> Result<()> {
    let pool = &ctx.accounts.pool;

    // Validates ordering, alignment, and the width cap in one pass.
    bins_in_range(lower_bin_id, upper_bin_id, pool.bin_step)?;

    let position = &mut ctx.accounts.position;
    position.bump = ctx.bumps.position;
    position.pool = pool.key();
    position.owner = ctx.accounts.owner.key();
    position.position_mint = ctx.accounts.position_mint.key();
    position.lower_bin_id = lower_bin_id;
    position.upper_bin_id = upper_bin_id;
    position.liquidity_per_bin = 0;
    position.fee_growth_snapshot_a = 0;
    position.fee_growth_snapshot_b = 0;

    let mint_a_key = pool.mint_a;
    let mint_b_key = pool.mint_b;
    let bin_step_bytes = pool.bin_step.to_le_bytes();
    let pool_seeds: &[&[u8]] = &[
        seeds::DLMM_POOL_SEED,
        mint_a_key.as_ref(),
        mint_b_key.as_ref(),
        &bin_step_bytes,
        &[pool.bump],
    ];

    mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.position_mint.to_account_info(),
                to: ctx.accounts.position_token_account.to_account_info(),
                authority: ctx.accounts.pool.to_account_info(),
            },
            &[pool_seeds],
        ),
        1,
    )?;

    emit!(DlmmPositionOpened {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        position: ctx.accounts.position.key(),
        position_mint: ctx.accounts.position_mint.key(),
        lower_bin_id,
        upper_bin_id,
    });

    Ok(())
}
