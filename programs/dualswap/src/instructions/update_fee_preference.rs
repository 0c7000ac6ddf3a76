use crate::amm::math::pending_fees;
use crate::amm::state::{AmmPosition, ConstantProductPool, FeePreference};
use crate::constants::seeds;
use crate::errors::DualswapError;
use crate::events::FeePreferenceUpdated;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

/// Toggle a position between manual claiming and auto-compounding.
///
/// Fees accrued so far belong to the old preference, so they are settled
/// (paid out) before the toggle takes effect.
#[derive(Accounts)]
pub struct UpdateFeePreference<'info> {
    #[account(
        mut,
        seeds = [seeds::AMM_POOL_SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
        has_one = vault_a @ DualswapError::InvalidVault,
        has_one = vault_b @ DualswapError::InvalidVault,
    )]
    pub pool: Account<'info, ConstantProductPool>,

    #[account(
        mut,
        seeds = [seeds::AMM_POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        has_one = owner @ DualswapError::Unauthorized,
        constraint = position.pool == pool.key() @ DualswapError::InvalidPool,
    )]
    pub position: Account<'info, AmmPosition>,

    #[account(constraint = mint_a.key() == pool.mint_a @ DualswapError::InvalidMint)]
    pub mint_a: InterfaceAccount<'info, Mint>,

    #[account(constraint = mint_b.key() == pool.mint_b @ DualswapError::InvalidMint)]
    pub mint_b: InterfaceAccount<'info, Mint>,

    #[account(mut)]
    pub vault_a: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub vault_b: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub owner_token_a: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub owner_token_b: InterfaceAccount<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Update fee preference handler
pub fn handler(ctx: Context<UpdateFeePreference>, new_preference: FeePreference) -> Result<()> {
    require!(
        new_preference != ctx.accounts.position.fee_preference,
        DualswapError::InvalidFeePreference
    );

    let (fees_a, fees_b) = pending_fees(
        ctx.accounts.pool.fee_growth_per_lp_a,
        ctx.accounts.pool.fee_growth_per_lp_b,
        ctx.accounts.position.fee_growth_snapshot_a,
        ctx.accounts.position.fee_growth_snapshot_b,
        ctx.accounts.position.lp_amount,
    )?;

    {
        let position = &mut ctx.accounts.position;
        position.fee_growth_snapshot_a = ctx.accounts.pool.fee_growth_per_lp_a;
        position.fee_growth_snapshot_b = ctx.accounts.pool.fee_growth_per_lp_b;
        position.fee_preference = new_preference;
    }

    let mint_a_key = ctx.accounts.pool.mint_a;
    let mint_b_key = ctx.accounts.pool.mint_b;
    let pool_bump = ctx.accounts.pool.bump;
    {
        let pool = &mut ctx.accounts.pool;
        pool.reserves_a = pool
            .reserves_a
            .checked_sub(fees_a)
            .ok_or(DualswapError::MathOverflow)?;
        pool.reserves_b = pool
            .reserves_b
            .checked_sub(fees_b)
            .ok_or(DualswapError::MathOverflow)?;
    }

    let pool_seeds: &[&[u8]] = &[
        seeds::AMM_POOL_SEED,
        mint_a_key.as_ref(),
        mint_b_key.as_ref(),
        &[pool_bump],
    ];

    if fees_a > 0 {
        transfer_checked(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from: ctx.accounts.vault_a.to_account_info(),
                    mint: ctx.accounts.mint_a.to_account_info(),
                    to: ctx.accounts.owner_token_a.to_account_info(),
                    authority: ctx.accounts.pool.to_account_info(),
                },
                &[pool_seeds],
            ),
            fees_a,
            ctx.accounts.mint_a.decimals,
        )?;
    }
    if fees_b > 0 {
        transfer_checked(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from: ctx.accounts.vault_b.to_account_info(),
                    mint: ctx.accounts.mint_b.to_account_info(),
                    to: ctx.accounts.owner_token_b.to_account_info(),
                    authority: ctx.accounts.pool.to_account_info(),
                },
                &[pool_seeds],
            ),
            fees_b,
            ctx.accounts.mint_b.decimals,
        )?;
    }

    emit!(FeePreferenceUpdated {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        new_preference,
    });

    Ok(())
}
