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

/// Add uniform liquidity across a declared bin range of a range position.
///
/// The range's bin accounts are passed as the trailing account list and
/// must match the caller's transaction bin cache exactly. The first deposit
/// may cover any sub-range of the opened range and narrows the position to
/// it; later deposits must cover the funded range exactly.
#[derive(Accounts)]
pub struct AddDlmmLiquidity<'info> {
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

    /// The caller's pre-populated bin cache
    #[account(
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

/// Resolve the half-open bin range `[start, start + count * step)` a deposit
/// declares against the position's stored bounds.
///
/// An unfunded position accepts any sub-range of its opened bounds and is
/// narrowed to it; a funded position only accepts its exact stored range,
/// since liquidity is tracked as a single per-bin figure.
pub fn resolve_deposit_range(
    position_lower: i32,
    position_upper: i32,
    funded: bool,
    start_bin_id: i32,
    bin_count: usize,
    bin_step: u16,
) -> Result<(i32, i32)> {
    require!(bin_step > 0, DualswapError::InvalidBinStep);
    require!(bin_count > 0, DualswapError::InvalidBinCount);

    let step = bin_step as i32;
    require!(
        start_bin_id.rem_euclid(step) == 0,
        DualswapError::InvalidBinId
    );

    let span = (bin_count as i32)
        .checked_mul(step)
        .ok_or(DualswapError::MathOverflow)?;
    let upper = start_bin_id
        .checked_add(span)
        .ok_or(DualswapError::MathOverflow)?;

    if funded {
        require!(
            start_bin_id == position_lower && upper == position_upper,
            DualswapError::InvalidBinRange
        );
    } else {
        require!(
            start_bin_id >= position_lower && upper <= position_upper,
            DualswapError::InvalidBinRange
        );
    }
    Ok((start_bin_id, upper))
}

/// Add liquidity handler
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, AddDlmmLiquidity<'info>>,
    start_bin_id: i32,
    liquidity_per_bin: u128,
    max_amount_a: u64,
    max_amount_b: u64,
) -> Result<()> {
    require!(liquidity_per_bin > 0, DualswapError::ZeroLiquidity);

    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;
    let bin_step = pool.bin_step;
    let active_bin_id = pool.active_bin_id;
    let old_liquidity = position.liquidity_per_bin;

    let (lower, upper) = resolve_deposit_range(
        position.lower_bin_id,
        position.upper_bin_id,
        old_liquidity > 0,
        start_bin_id,
        ctx.remaining_accounts.len(),
        bin_step,
    )?;
    let count = bins_in_range(lower, upper, bin_step)?;
    let bin_ids = enumerate_bin_ids(lower, count as usize, bin_step as i32)?;
    verify_bin_accounts(
        &ctx.accounts.bin_cache,
        ctx.remaining_accounts,
        &pool.key(),
        &bin_ids,
    )?;

    let mut total_a = 0u64;
    let mut total_b = 0u64;
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
        total_a = total_a
            .checked_add(amount_a)
            .ok_or(DualswapError::MathOverflow)?;
        total_b = total_b
            .checked_add(amount_b)
            .ok_or(DualswapError::MathOverflow)?;

        // Settle fees accrued on the existing liquidity before it grows.
        if old_liquidity > 0 {
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
        }
        max_growth_a = max_growth_a.max(bin.fee_growth_per_unit_a);
        max_growth_b = max_growth_b.max(bin.fee_growth_per_unit_b);

        bin.liquidity = bin
            .liquidity
            .checked_add(liquidity_per_bin)
            .ok_or(DualswapError::MathOverflow)?;
    }

    require!(
        total_a <= max_amount_a && total_b <= max_amount_b,
        DualswapError::SlippageExceeded
    );

    {
        let position = &mut ctx.accounts.position;
        if old_liquidity == 0 {
            position.lower_bin_id = lower;
            position.upper_bin_id = upper;
        }
        position.liquidity_per_bin = old_liquidity
            .checked_add(liquidity_per_bin)
            .ok_or(DualswapError::MathOverflow)?;
        position.fee_growth_snapshot_a = max_growth_a;
        position.fee_growth_snapshot_b = max_growth_b;
    }
    {
        let pool = &mut ctx.accounts.pool;
        pool.reserves_a = pool
            .reserves_a
            .checked_add(total_a)
            .ok_or(DualswapError::MathOverflow)?
            .checked_sub(fees_a)
            .ok_or(DualswapError::MathOverflow)?;
        pool.reserves_b = pool
            .reserves_b
            .checked_add(total_b)
            .ok_or(DualswapError::MathOverflow)?
            .checked_sub(fees_b)
            .ok_or(DualswapError::MathOverflow)?;
    }

    if total_a > 0 {
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
            total_a,
            ctx.accounts.mint_a.decimals,
        )?;
    }
    if total_b > 0 {
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
            total_b,
            ctx.accounts.mint_b.decimals,
        )?;
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

    emit!(DlmmLiquidityChanged {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        position: ctx.accounts.position.key(),
        liquidity_delta: (liquidity_per_bin as i128)
            .checked_mul(count as i128)
            .ok_or(DualswapError::MathOverflow)?,
        amount_a: total_a,
        amount_b: total_b,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_deposit_narrows_to_declared_range() {
        // A position opened over [-100, 100) funded with 3 bins at -20.
        let (lower, upper) = resolve_deposit_range(-100, 100, false, -20, 3, 10).unwrap();
        assert_eq!((lower, upper), (-20, 10));
    }

    #[test]
    fn test_first_deposit_may_cover_full_range() {
        let (lower, upper) = resolve_deposit_range(-100, 100, false, -100, 20, 10).unwrap();
        assert_eq!((lower, upper), (-100, 100));
    }

    #[test]
    fn test_deposit_outside_opened_range_rejected() {
        // Starts below the opened lower bound.
        assert!(resolve_deposit_range(-100, 100, false, -110, 3, 10).is_err());
        // Ends above the opened upper bound.
        assert!(resolve_deposit_range(-100, 100, false, 90, 2, 10).is_err());
    }

    #[test]
    fn test_funded_position_requires_exact_range() {
        // Funded range is [-20, 10); a top-up must cover it exactly.
        assert!(resolve_deposit_range(-20, 10, true, -20, 2, 10).is_err());
        assert!(resolve_deposit_range(-20, 10, true, -10, 2, 10).is_err());
        let (lower, upper) = resolve_deposit_range(-20, 10, true, -20, 3, 10).unwrap();
        assert_eq!((lower, upper), (-20, 10));
    }

    #[test]
    fn test_deposit_range_alignment_and_count() {
        // Start must sit on the bin grid.
        assert!(resolve_deposit_range(-100, 100, false, -15, 3, 10).is_err());
        // At least one bin must be supplied.
        assert!(resolve_deposit_range(-100, 100, false, -20, 0, 10).is_err());
    }
}
