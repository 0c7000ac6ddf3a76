use crate::constants::seeds;
use crate::dlmm::math::{
    accrued_bin_fees, amounts_for_bin, bins_in_range, price_at_bin,
};
use crate::dlmm::state::{Bin, DiscretizedPool, RangePosition};
use crate::errors::DualswapError;
use crate::events::DlmmLiquidityChanged;
use crate::state::{enumerate_bin_ids, verify_bin_accounts, TransactionBinCache};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

/// Withdraw uniform liquidity from every bin of a range position, paying out
/// principal plus the fees accrued since the last settlement. The bin cache
/// is consumed and closed.
#[derive(Accounts)]
pub struct RemoveDlmmLiquidity<'info> {
    #[account(
        mut,
        seeds = [
            seeds::DLMM_POOL_SEED,
            pool.mint_a.as_ref(),
            pool.mint_b.as_ref(),
            &pool.bin_step.to_le_bytes(),
        ],
        bump = pool.bump,
        has_one = vault_a @ DualswapError::InvalidVault,
        has_one = vault_b @ DualswapError::InvalidVault,
    )]
    pub pool: Account<'info, DiscretizedPool>,

    #[account(
        mut,
        seeds = [seeds::POSITION_SEED, position.position_mint.as_ref()],
        bump = position.bump,
        constraint = position.pool == pool.key() @ DualswapError::InvalidPool,
    )]
    pub position: Account<'info, RangePosition>,

    /// Proof of position ownership
    #[account(
        constraint = position_token_account.mint == position.position_mint
            @ DualswapError::InvalidMint,
        constraint = position_token_account.owner == owner.key()
            @ DualswapError::Unauthorized,
        constraint = position_token_account.amount == 1 @ DualswapError::Unauthorized,
    )]
    pub position_token_account: InterfaceAccount<'info, TokenAccount>,

    /// The caller's bin cache, closed after consumption
    #[account(
        mut,
        close = owner,
        seeds = [seeds::BIN_CACHE_SEED, owner.key().as_ref()],
        bump = bin_cache.bump,
        constraint = bin_cache.owner == owner.key() @ DualswapError::BinCacheMismatch,
    )]
    pub bin_cache: Account<'info, TransactionBinCache>,

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

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Remove liquidity handler
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, RemoveDlmmLiquidity<'info>>,
    liquidity_per_bin: u128,
    min_amount_a: u64,
    min_amount_b: u64,
) -> Result<()> {
    require!(liquidity_per_bin > 0, DualswapError::ZeroLiquidity);
    require!(
        liquidity_per_bin <= ctx.accounts.position.liquidity_per_bin,
        DualswapError::InsufficientLiquidity
    );

    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;
    let bin_step = pool.bin_step;
    let active_bin_id = pool.active_bin_id;
    let old_liquidity = position.liquidity_per_bin;

    let count = bins_in_range(position.lower_bin_id, position.upper_bin_id, bin_step)?;
    let bin_ids = enumerate_bin_ids(position.lower_bin_id, count as usize, bin_step as i32)?;
    verify_bin_accounts(
        &ctx.accounts.bin_cache,
        ctx.remaining_accounts,
        &pool.key(),
        &bin_ids,
    )?;

    let mut principal_a = 0u64;
    let mut principal_b = 0u64;
    let mut fees_a = 0u64;
    let mut fees_b = 0u64;
    let mut max_growth_a = 0u128;
    let mut max_growth_b = 0u128;

    for (info, bin_id) in ctx.remaining_accounts.iter().zip(bin_ids.iter()) {
        let loader = AccountLoader::<Bin>::try_from(info)?;
        let mut bin = loader.load_mut()?;
        require!(bin.bin_id == *bin_id, DualswapError::InvalidBinAccount);

        let price = price_at_bin(*bin_id, bin_step)?;
        let (amount_a, amount_b) =
            amounts_for_bin(*bin_id, active_bin_id, price, liquidity_per_bin)?;
        principal_a = principal_a
            .checked_add(amount_a)
            .ok_or(DualswapError::MathOverflow)?;
        principal_b = principal_b
            .checked_add(amount_b)
            .ok_or(DualswapError::MathOverflow)?;

        fees_a = fees_a
            .checked_add(accrued_bin_fees(
                bin.fee_growth_per_unit_a,
                position.fee_growth_snapshot_a,
                old_liquidity,
            )?)
            .ok_or(DualswapError::MathOverflow)?;
        fees_b = fees_b
            .checked_add(accrued_bin_fees(
                bin.fee_growth_per_unit_b,
                position.fee_growth_snapshot_b,
                old_liquidity,
            )?)
            .ok_or(DualswapError::MathOverflow)?;
        max_growth_a = max_growth_a.max(bin.fee_growth_per_unit_a);
        max_growth_b = max_growth_b.max(bin.fee_growth_per_unit_b);

        bin.liquidity = bin
            .liquidity
            .checked_sub(liquidity_per_bin)
            .ok_or(DualswapError::InsufficientLiquidity)?;
    }

    require!(
        principal_a >= min_amount_a && principal_b >= min_amount_b,
        DualswapError::SlippageExceeded
    );

    let total_a = principal_a
        .checked_add(fees_a)
        .ok_or(DualswapError::MathOverflow)?;
    let total_b = principal_b
        .checked_add(fees_b)
        .ok_or(DualswapError::MathOverflow)?;

    {
        let position = &mut ctx.accounts.position;
        position.liquidity_per_bin = old_liquidity
            .checked_sub(liquidity_per_bin)
            .ok_or(DualswapError::MathOverflow)?;
        position.fee_growth_snapshot_a = max_growth_a;
        position.fee_growth_snapshot_b = max_growth_b;
    }
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

    let mint_a_key = ctx.accounts.pool.mint_a;
    let mint_b_key = ctx.accounts.pool.mint_b;
    let bin_step_bytes = ctx.accounts.pool.bin_step.to_le_bytes();
    let pool_seeds: &[&[u8]] = &[
        seeds::DLMM_POOL_SEED,
        mint_a_key.as_ref(),
        mint_b_key.as_ref(),
        &bin_step_bytes,
        &[ctx.accounts.pool.bump],
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

    emit!(DlmmLiquidityChanged {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        position: ctx.accounts.position.key(),
        liquidity_delta: -(liquidity_per_bin as i128)
            .checked_mul(count as i128)
            .ok_or(DualswapError::MathOverflow)?,
        amount_a: total_a,
        amount_b: total_b,
    });

    Ok(())
}
