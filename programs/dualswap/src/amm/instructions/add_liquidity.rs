use crate::amm::math::{deposit_quote, pending_fees};
use crate::amm::state::{AmmPosition, ConstantProductPool, FeePreference};
use crate::constants::seeds;
use crate::errors::DualswapError;
use crate::events::AmmLiquidityAdded;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
};

/// Deposit into a constant-product pool and mint LP tokens
#[derive(Accounts)]
pub struct AddAmmLiquidity<'info> {
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

    /// The depositor's token A account
    #[account(mut)]
    pub owner_token_a: InterfaceAccount<'info, TokenAccount>,

    /// The depositor's token B account
    #[account(mut)]
    pub owner_token_b: InterfaceAccount<'info, TokenAccount>,

    /// The depositor's LP token account
    #[account(mut)]
    pub owner_lp_token: InterfaceAccount<'info, TokenAccount>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Add liquidity handler
pub fn handler(
    ctx: Context<AddAmmLiquidity>,
    amount_a_desired: u64,
    amount_b_desired: u64,
    min_lp_out: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let mut lp_supply = ctx.accounts.lp_mint.supply;

    let mint_a_key = ctx.accounts.pool.mint_a;
    let mint_b_key = ctx.accounts.pool.mint_b;
    let pool_bump = ctx.accounts.pool.bump;

    ctx.accounts.pool.update_oracle(now)?;

    // Settle fees accrued since the last snapshot before lp_amount changes,
    // otherwise the new LP tokens would earn retroactively.
    let (fees_a, fees_b) = pending_fees(
        ctx.accounts.pool.fee_growth_per_lp_a,
        ctx.accounts.pool.fee_growth_per_lp_b,
        ctx.accounts.position.fee_growth_snapshot_a,
        ctx.accounts.position.fee_growth_snapshot_b,
        ctx.accounts.position.lp_amount,
    )?;

    let mut payout_a = 0u64;
    let mut payout_b = 0u64;
    let mut compounded_lp = 0u64;
    if fees_a > 0 || fees_b > 0 {
        match ctx.accounts.position.fee_preference {
            FeePreference::ManualClaim => {
                payout_a = fees_a;
                payout_b = fees_b;
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
            FeePreference::AutoCompound => {
                // Fees are already in the vaults, so they convert to LP in
                // place without a transfer.
                let pool = &ctx.accounts.pool;
                let compound =
                    deposit_quote(pool.reserves_a, pool.reserves_b, lp_supply, fees_a, fees_b)?;
                compounded_lp = compound.lp_to_mint;
                lp_supply = lp_supply
                    .checked_add(compounded_lp)
                    .ok_or(DualswapError::MathOverflow)?;
            }
        }
    }
    ctx.accounts.position.fee_growth_snapshot_a = ctx.accounts.pool.fee_growth_per_lp_a;
    ctx.accounts.position.fee_growth_snapshot_b = ctx.accounts.pool.fee_growth_per_lp_b;

    let quote = deposit_quote(
        ctx.accounts.pool.reserves_a,
        ctx.accounts.pool.reserves_b,
        lp_supply,
        amount_a_desired,
        amount_b_desired,
    )?;
    require!(quote.lp_to_mint > 0, DualswapError::ZeroLiquidity);
    require!(
        quote.lp_to_mint >= min_lp_out,
        DualswapError::SlippageExceeded
    );

    {
        let pool = &mut ctx.accounts.pool;
        pool.reserves_a = pool
            .reserves_a
            .checked_add(quote.amount_a)
            .ok_or(DualswapError::MathOverflow)?;
        pool.reserves_b = pool
            .reserves_b
            .checked_add(quote.amount_b)
            .ok_or(DualswapError::MathOverflow)?;
    }
    {
        let position = &mut ctx.accounts.position;
        position.lp_amount = position
            .lp_amount
            .checked_add(quote.lp_to_mint)
            .ok_or(DualswapError::MathOverflow)?
            .checked_add(compounded_lp)
            .ok_or(DualswapError::MathOverflow)?;
    }

    let pool_seeds: &[&[u8]] = &[
        seeds::AMM_POOL_SEED,
        mint_a_key.as_ref(),
        mint_b_key.as_ref(),
        &[pool_bump],
    ];

    transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.owner_token_a.to_account_info(),
                mint: ctx.accounts.mint_a.to_account_info(),
                to: ctx.accounts.vault_a.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        ),
        quote.amount_a,
        ctx.accounts.mint_a.decimals,
    )?;

    transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.owner_token_b.to_account_info(),
                mint: ctx.accounts.mint_b.to_account_info(),
                to: ctx.accounts.vault_b.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        ),
        quote.amount_b,
        ctx.accounts.mint_b.decimals,
    )?;

    mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.lp_mint.to_account_info(),
                to: ctx.accounts.owner_lp_token.to_account_info(),
                authority: ctx.accounts.pool.to_account_info(),
            },
            &[pool_seeds],
        ),
        quote
            .lp_to_mint
            .checked_add(compounded_lp)
            .ok_or(DualswapError::MathOverflow)?,
    )?;

    if payout_a > 0 {
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
            payout_a,
            ctx.accounts.mint_a.decimals,
        )?;
    }
    if payout_b > 0 {
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
            payout_b,
            ctx.accounts.mint_b.decimals,
        )?;
    }

    emit!(AmmLiquidityAdded {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        lp_minted: quote.lp_to_mint,
        amount_a: quote.amount_a,
        amount_b: quote.amount_b,
    });

    Ok(())
}
