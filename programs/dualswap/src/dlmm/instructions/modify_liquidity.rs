use crate::constants::seeds;
use crate::dlmm::math::{
    accrued_bin_fees, amounts_for_bin, bins_in_range, price_at_bin,
};
use crate::dlmm::state::{Bin, DiscretizedPool, RangePosition};
use crate::errors::DualswapError;
use crate::events::DlmmPositionRebalanced;
use crate::state::{check_bin_lists, derive_bin_address, enumerate_bin_ids, TransactionBinCache};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

/// Move all liquidity from one range position into another in a single
/// transaction.
///
/// The trailing account list is the old range's bins followed by the new
/// range's bins, and must match the bin cache in that exact order. Whatever
/// value the new range does not absorb is paid out as surplus; the freed
/// amounts must fully cover the new range's requirements.
#[derive(Accounts)]
pub struct ModifyDlmmLiquidity<'info> {
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

    /// The position being emptied
    #[account(
        mut,
        seeds = [seeds::POSITION_SEED, old_position.position_mint.as_ref()],
        bump = old_position.bump,
        constraint = old_position.pool == pool.key() @ DualswapError::InvalidPool,
    )]
    pub old_position: Account<'info, RangePosition>,

    /// The empty position receiving the moved liquidity
    #[account(
        mut,
        seeds = [seeds::POSITION_SEED, new_position.position_mint.as_ref()],
        bump = new_position.bump,
        constraint = new_position.pool == pool.key() @ DualswapError::InvalidPool,
        constraint = new_position.liquidity_per_bin == 0 @ DualswapError::PositionNotEmpty,
    )]
    pub new_position: Account<'info, RangePosition>,

    /// Proof of old position ownership
    #[account(
        constraint = old_position_token_account.mint == old_position.position_mint
            @ DualswapError::InvalidMint,
        constraint = old_position_token_account.owner == owner.key()
            @ DualswapError::Unauthorized,
        constraint = old_position_token_account.amount == 1 @ DualswapError::Unauthorized,
    )]
    pub old_position_token_account: InterfaceAccount<'info, TokenAccount>,

    /// Proof of new position ownership
    #[account(
        constraint = new_position_token_account.mint == new_position.position_mint
            @ DualswapError::InvalidMint,
        constraint = new_position_token_account.owner == owner.key()
            @ DualswapError::Unauthorized,
        constraint = new_position_token_account.amount == 1 @ DualswapError::Unauthorized,
    )]
    pub new_position_token_account: InterfaceAccount<'info, TokenAccount>,

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

/// Modify (rebalance) liquidity handler
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, ModifyDlmmLiquidity<'info>>,
    new_liquidity_per_bin: u128,
    min_surplus_a: u64,
    min_surplus_b: u64,
) -> Result<()> {
    require!(new_liquidity_per_bin > 0, DualswapError::ZeroLiquidity);
    require!(
        ctx.accounts.old_position.liquidity_per_bin > 0,
        DualswapError::ZeroLiquidity
    );

    let pool = &ctx.accounts.pool;
    let pool_key = pool.key();
    let bin_step = pool.bin_step;
    let active_bin_id = pool.active_bin_id;
    let old_liquidity = ctx.accounts.old_position.liquidity_per_bin;

    let old_count = bins_in_range(
        ctx.accounts.old_position.lower_bin_id,
        ctx.accounts.old_position.upper_bin_id,
        bin_step,
    )?;
    let new_count = bins_in_range(
        ctx.accounts.new_position.lower_bin_id,
        ctx.accounts.new_position.upper_bin_id,
        bin_step,
    )?;

    let old_ids = enumerate_bin_ids(
        ctx.accounts.old_position.lower_bin_id,
        old_count as usize,
        bin_step as i32,
    )?;
    let new_ids = enumerate_bin_ids(
        ctx.accounts.new_position.lower_bin_id,
        new_count as usize,
        bin_step as i32,
    )?;

    // The cached working set is the concatenation of both ranges.
    let mut expected: Vec<Pubkey> = Vec::with_capacity(old_ids.len() + new_ids.len());
    for id in old_ids.iter().chain(new_ids.iter()) {
        expected.push(derive_bin_address(&pool_key, *id));
    }
    let supplied_keys: Vec<Pubkey> = ctx.remaining_accounts.iter().map(|info| info.key()).collect();
    check_bin_lists(&ctx.accounts.bin_cache.bins, &supplied_keys, &expected)?;
    for info in ctx.remaining_accounts {
        require_keys_eq!(*info.owner, crate::ID, DualswapError::InvalidBinAccount);
    }

    // Drain the old range: principal plus accrued fees.
    let mut freed_a = 0u64;
    let mut freed_b = 0u64;
    let mut old_max_growth_a = 0u128;
    let mut old_max_growth_b = 0u128;
    for (info, bin_id) in ctx.remaining_accounts[..old_ids.len()]
        .iter()
        .zip(old_ids.iter())
    {
        let loader = AccountLoader::<Bin>::try_from(info)?;
        let mut bin = loader.load_mut()?;
        require!(bin.bin_id == *bin_id, DualswapError::InvalidBinAccount);

        let price = price_at_bin(*bin_id, bin_step)?;
        let (amount_a, amount_b) = amounts_for_bin(*bin_id, active_bin_id, price, old_liquidity)?;
        let fees_a = accrued_bin_fees(
            bin.fee_growth_per_unit_a,
            ctx.accounts.old_position.fee_growth_snapshot_a,
            old_liquidity,
        )?;
        let fees_b = accrued_bin_fees(
            bin.fee_growth_per_unit_b,
            ctx.accounts.old_position.fee_growth_snapshot_b,
            old_liquidity,
        )?;
        freed_a = freed_a
            .checked_add(amount_a)
            .ok_or(DualswapError::MathOverflow)?
            .checked_add(fees_a)
            .ok_or(DualswapError::MathOverflow)?;
        freed_b = freed_b
            .checked_add(amount_b)
            .ok_or(DualswapError::MathOverflow)?
            .checked_add(fees_b)
            .ok_or(DualswapError::MathOverflow)?;
        old_max_growth_a = old_max_growth_a.max(bin.fee_growth_per_unit_a);
        old_max_growth_b = old_max_growth_b.max(bin.fee_growth_per_unit_b);

        bin.liquidity = bin
            .liquidity
            .checked_sub(old_liquidity)
            .ok_or(DualswapError::InsufficientLiquidity)?;
    }

    // Fill the new range.
    let mut required_a = 0u64;
    let mut required_b = 0u64;
    let mut new_max_growth_a = 0u128;
    let mut new_max_growth_b = 0u128;
    for (info, bin_id) in ctx.remaining_accounts[old_ids.len()..]
        .iter()
        .zip(new_ids.iter())
    {
        let loader = AccountLoader::<Bin>::try_from(info)?;
        let mut bin = loader.load_mut()?;
        require!(bin.bin_id == *bin_id, DualswapError::InvalidBinAccount);

        let price = price_at_bin(*bin_id, bin_step)?;
        let (amount_a, amount_b) =
            amounts_for_bin(*bin_id, active_bin_id, price, new_liquidity_per_bin)?;
        required_a = required_a
            .checked_add(amount_a)
            .ok_or(DualswapError::MathOverflow)?;
        required_b = required_b
            .checked_add(amount_b)
            .ok_or(DualswapError::MathOverflow)?;
        new_max_growth_a = new_max_growth_a.max(bin.fee_growth_per_unit_a);
        new_max_growth_b = new_max_growth_b.max(bin.fee_growth_per_unit_b);

        bin.liquidity = bin
            .liquidity
            .checked_add(new_liquidity_per_bin)
            .ok_or(DualswapError::MathOverflow)?;
    }

    // The freed value must cover the new range on both sides; the remainder
    // is returned to the owner.
    let surplus_a = freed_a
        .checked_sub(required_a)
        .ok_or(DualswapError::InsufficientLiquidity)?;
    let surplus_b = freed_b
        .checked_sub(required_b)
        .ok_or(DualswapError::InsufficientLiquidity)?;
    require!(
        surplus_a >= min_surplus_a && surplus_b >= min_surplus_b,
        DualswapError::SlippageExceeded
    );

    {
        let old_position = &mut ctx.accounts.old_position;
        old_position.liquidity_per_bin = 0;
        old_position.fee_growth_snapshot_a = old_max_growth_a;
        old_position.fee_growth_snapshot_b = old_max_growth_b;
    }
    {
        let new_position = &mut ctx.accounts.new_position;
        new_position.liquidity_per_bin = new_liquidity_per_bin;
        new_position.fee_growth_snapshot_a = new_max_growth_a;
        new_position.fee_growth_snapshot_b = new_max_growth_b;
    }
    {
        let pool = &mut ctx.accounts.pool;
        pool.reserves_a = pool
            .reserves_a
            .checked_sub(surplus_a)
            .ok_or(DualswapError::MathOverflow)?;
        pool.reserves_b = pool
            .reserves_b
            .checked_sub(surplus_b)
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

    if surplus_a > 0 {
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
            surplus_a,
            ctx.accounts.mint_a.decimals,
        )?;
    }
    if surplus_b > 0 {
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
            surplus_b,
            ctx.accounts.mint_b.decimals,
        )?;
    }

    emit!(DlmmPositionRebalanced {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        old_position: ctx.accounts.old_position.key(),
        new_position: ctx.accounts.new_position.key(),
        liquidity_moved: new_liquidity_per_bin,
        surplus_a,
        surplus_b,
    });

    Ok(())
}
