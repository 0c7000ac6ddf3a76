use crate::amm::math::{pending_fees, withdraw_amounts};
use crate::amm::state::{AmmPosition, ConstantProductPool};
use crate::constants::seeds;
use crate::errors::DualswapError;
use crate::events::AmmLiquidityRemoved;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
};

/// Burn LP tokens and withdraw the proportional share of reserves
#[derive(Accounts)]
pub struct RemoveAmmLiquidity<'info> {
    #[account(
        mut,
        seeds = [seeds::AMM_POOL_SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
        has_one = vault_a @ DualswapError::InvalidVault,
        has_one = vault_b @ DualswapError::InvalidVault,
        has_one = lp_mint @ DualswapError::InvalidMint,
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
    pub lp_mint: InterfaceAccount<'info, Mint>,

    #[account(mut)]
    pub vault_a: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub vault_b: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub owner_token_a: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub owner_token_b: InterfaceAccount<'info, TokenAccount>,

    /// The LP tokens being burned come from here
    #[account(mut)]
    pub owner_lp_token: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Remove liquidity handler
pub fn handler(
    ctx: Context<RemoveAmmLiquidity>,
    lp_to_burn: u64,
    min_amount_a: u64,
    min_amount_b: u64,
) -> Result<()> {
    require!(lp_to_burn > 0, DualswapError::ZeroAmount);
    require!(
        lp_to_burn <= ctx.accounts.position.lp_amount,
        DualswapError::InsufficientLiquidity
    );

    let now = Clock::get()?.unix_timestamp;
    let lp_supply = ctx.accounts.lp_mint.supply;

    let mint_a_key = ctx.accounts.pool.mint_a;
    let mint_b_key = ctx.accounts.pool.mint_b;
    let pool_bump = ctx.accounts.pool.bump;

    ctx.accounts.pool.update_oracle(now)?;

    // Settle accrued fees for the full position before lp_amount shrinks.
    // On withdrawal both preferences pay out; there is no point compounding
    // into a position that is being reduced.
    let (fees_a, fees_b) = pending_fees(
        ctx.accounts.pool.fee_growth_per_lp_a,
        ctx.accounts.pool.fee_growth_per_lp_b,
        ctx.accounts.position.fee_growth_snapshot_a,
        ctx.accounts.position.fee_growth_snapshot_b,
        ctx.accounts.position.lp_amount,
    )?;
    ctx.accounts.position.fee_growth_snapshot_a = ctx.accounts.pool.fee_growth_per_lp_a;
    ctx.accounts.position.fee_growth_snapshot_b = ctx.accounts.pool.fee_growth_per_lp_b;

    let (amount_a, amount_b) = withdraw_amounts(
        ctx.accounts.pool.reserves_a,
        ctx.accounts.pool.reserves_b,
        lp_supply,
        lp_to_burn,
    )?;
    require!(amount_a >= min_amount_a, DualswapError::SlippageExceeded);
    require!(amount_b >= min_amount_b, DualswapError::SlippageExceeded);

    let total_a = amount_a
        .checked_add(fees_a)
        .ok_or(DualswapError::MathOverflow)?;
    let total_b = amount_b
        .checked_add(fees_b)
        .ok_or(DualswapError::MathOverflow)?;

    {
        let pool = &mut ctx.accounts.pool;
        pool.reserves_a = pool
            .reserves_a
            .checked_sub(total_a)
            .ok_or(DualswapError::MathOverflow)?;
        pool.reserves_b = pool
            .reserves_b
            .checked_sub(total_b)
            .ok_or(DualswapError::MathOverflow)?;
    }
    {
        let position = &mut ctx.accounts.position;
        position.lp_amount = position
            .lp_amount
            .checked_sub(lp_to_burn)
            .ok_or(DualswapError::MathOverflow)?;
    }

    burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.lp_mint.to_account_info(),
                from: ctx.accounts.owner_lp_token.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        ),
        lp_to_burn,
    )?;

    let pool_seeds: &[&[u8]] = &[
        seeds::AMM_POOL_SEED,
        mint_a_key.as_ref(),
        mint_b_key.as_ref(),
        &[pool_bump],
    ];

    if total_a > 0 {
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
            total_a,
            ctx.accounts.mint_a.decimals,
        )?;
    }
    if total_b > 0 {
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
            total_b,
            ctx.accounts.mint_b.decimals,
        )?;
    }

    emit!(AmmLiquidityRemoved {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        lp_burned: lp_to_burn,
        amount_a: total_a,
        amount_b: total_b,
    });

    Ok(())
}
