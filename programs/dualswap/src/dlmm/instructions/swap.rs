use crate::constants::{seeds, BASIS_POINT_MAX};
use crate::dlmm::math::{compute_bin_swap, fee_growth_delta, price_at_bin, SwapDirection};
use crate::dlmm::state::{Bin, DiscretizedPool};
use crate::errors::DualswapError;
use crate::events::DlmmSwapExecuted;
use crate::math::{mul_div, to_u64};
use crate::state::{enumerate_bin_ids, verify_bin_accounts, TransactionBinCache};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

/// Swap against a discretized pool, walking the bin ladder from the active
/// bin. The trailing account list enumerates the bins the trader is willing
/// to cross, in walk order, and must match the bin cache.
#[derive(Accounts)]
pub struct DlmmSwap<'info> {
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

    /// The trader's pre-populated bin cache
    #[account(
        seeds = [seeds::BIN_CACHE_SEED, trader.key().as_ref()],
        bump = bin_cache.bump,
        constraint = bin_cache.owner == trader.key() @ DualswapError::BinCacheMismatch,
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

    /// Protocol fee vault on the input side
    #[account(mut)]
    pub protocol_fee_vault: InterfaceAccount<'info, TokenAccount>,

    /// The trader's source token account; its mint decides the direction
    #[account(mut)]
    pub trader_source: InterfaceAccount<'info, TokenAccount>,

    /// The trader's destination token account
    #[account(mut)]
    pub trader_destination: InterfaceAccount<'info, TokenAccount>,

    /// Optional referrer token account on the input side
    #[account(mut)]
    pub referrer_token_account: Option<InterfaceAccount<'info, TokenAccount>>,

    pub trader: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Swap handler
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, DlmmSwap<'info>>,
    amount_in: u64,
    min_amount_out: u64,
) -> Result<()> {
    require!(amount_in > 0, DualswapError::ZeroAmount);
    require!(
        !ctx.accounts.bin_cache.bins.is_empty(),
        DualswapError::InvalidBinCount
    );

    let pool = &ctx.accounts.pool;
    let direction = if ctx.accounts.trader_source.mint == pool.mint_a {
        SwapDirection::AForB
    } else if ctx.accounts.trader_source.mint == pool.mint_b {
        SwapDirection::BForA
    } else {
        return err!(DualswapError::InvalidMint);
    };

    let (input_mint_key, output_mint_key) = match direction {
        SwapDirection::AForB => (pool.mint_a, pool.mint_b),
        SwapDirection::BForA => (pool.mint_b, pool.mint_a),
    };
    require!(
        ctx.accounts.trader_destination.mint == output_mint_key,
        DualswapError::InvalidMint
    );

    let expected_fee_vault = match direction {
        SwapDirection::AForB => pool.protocol_fee_vault_a,
        SwapDirection::BForA => pool.protocol_fee_vault_b,
    };
    require_keys_eq!(
        ctx.accounts.protocol_fee_vault.key(),
        expected_fee_vault,
        DualswapError::InvalidVault
    );

    if let Some(referrer) = &ctx.accounts.referrer_token_account {
        require!(referrer.mint == input_mint_key, DualswapError::InvalidMint);
        require!(
            referrer.owner != ctx.accounts.trader.key(),
            DualswapError::ReferrerIsTrader
        );
    }

    let bin_step = pool.bin_step;
    let fee_rate = pool.fee_rate;
    let protocol_fee_share = pool.protocol_fee_share;
    let id_step = direction.id_step(bin_step);

    // The walk starts at the active bin and proceeds in price order; the
    // cache length bounds how far it may go.
    let bin_ids = enumerate_bin_ids(pool.active_bin_id, ctx.accounts.bin_cache.bins.len(), id_step)?;
    verify_bin_accounts(
        &ctx.accounts.bin_cache,
        ctx.remaining_accounts,
        &pool.key(),
        &bin_ids,
    )?;

    let mut remaining_in = amount_in;
    let mut total_out = 0u64;
    let mut total_protocol_fee = 0u64;
    let mut bins_crossed = 0u64;
    let mut active_bin_id = pool.active_bin_id;

    for (info, bin_id) in ctx.remaining_accounts.iter().zip(bin_ids.iter()) {
        let loader = AccountLoader::<Bin>::try_from(info)?;
        let mut bin = loader.load_mut()?;
        require!(bin.bin_id == *bin_id, DualswapError::InvalidBinAccount);

        let price = price_at_bin(*bin_id, bin_step)?;
        let step = compute_bin_swap(
            direction,
            bin.liquidity,
            price,
            remaining_in,
            fee_rate,
            protocol_fee_share,
        )?;

        total_out = total_out
            .checked_add(step.amount_out)
            .ok_or(DualswapError::MathOverflow)?;
        total_protocol_fee = total_protocol_fee
            .checked_add(step.protocol_fee)
            .ok_or(DualswapError::MathOverflow)?;
        // The gross-up may overshoot the remainder by one unit of rounding.
        remaining_in = remaining_in.saturating_sub(step.amount_in_consumed);

        // LP fees accrue to the bin on the input side.
        let growth = fee_growth_delta(step.lp_fee, bin.liquidity)?;
        match direction {
            SwapDirection::AForB => {
                bin.fee_growth_per_unit_a = bin
                    .fee_growth_per_unit_a
                    .checked_add(growth)
                    .ok_or(DualswapError::MathOverflow)?;
            }
            SwapDirection::BForA => {
                bin.fee_growth_per_unit_b = bin
                    .fee_growth_per_unit_b
                    .checked_add(growth)
                    .ok_or(DualswapError::MathOverflow)?;
            }
        }

        if step.exhausted {
            // The bin is drained; the active price steps past it.
            active_bin_id = active_bin_id
                .checked_add(id_step)
                .ok_or(DualswapError::MathOverflow)?;
            bins_crossed = bins_crossed
                .checked_add(1)
                .ok_or(DualswapError::MathOverflow)?;
        }
        if remaining_in == 0 {
            break;
        }
    }

    require!(remaining_in == 0, DualswapError::InsufficientLiquidityForSwap);
    require!(
        total_out >= min_amount_out,
        DualswapError::SlippageExceeded
    );

    let referrer_fee = if ctx.accounts.referrer_token_account.is_some() {
        to_u64(mul_div(
            total_protocol_fee as u128,
            pool.referrer_fee_share as u128,
            BASIS_POINT_MAX,
        )?)?
    } else {
        0
    };
    let protocol_fee_to_vault = total_protocol_fee
        .checked_sub(referrer_fee)
        .ok_or(DualswapError::MathOverflow)?;

    {
        let pool = &mut ctx.accounts.pool;
        pool.active_bin_id = active_bin_id;
        pool.volatility_accumulator = pool
            .volatility_accumulator
            .checked_add(bins_crossed)
            .ok_or(DualswapError::MathOverflow)?;

        let retained = amount_in
            .checked_sub(total_protocol_fee)
            .ok_or(DualswapError::MathOverflow)?;
        match direction {
            SwapDirection::AForB => {
                pool.reserves_a = pool
                    .reserves_a
                    .checked_add(retained)
                    .ok_or(DualswapError::MathOverflow)?;
                pool.reserves_b = pool
                    .reserves_b
                    .checked_sub(total_out)
                    .ok_or(DualswapError::MathOverflow)?;
            }
            SwapDirection::BForA => {
                pool.reserves_b = pool
                    .reserves_b
                    .checked_add(retained)
                    .ok_or(DualswapError::MathOverflow)?;
                pool.reserves_a = pool
                    .reserves_a
                    .checked_sub(total_out)
                    .ok_or(DualswapError::MathOverflow)?;
            }
        }
    }

    let (input_mint, output_mint, input_vault, output_vault) = match direction {
        SwapDirection::AForB => (
            &ctx.accounts.mint_a,
            &ctx.accounts.mint_b,
            &ctx.accounts.vault_a,
            &ctx.accounts.vault_b,
        ),
        SwapDirection::BForA => (
            &ctx.accounts.mint_b,
            &ctx.accounts.mint_a,
            &ctx.accounts.vault_b,
            &ctx.accounts.vault_a,
        ),
    };

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

    transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.trader_source.to_account_info(),
                mint: input_mint.to_account_info(),
                to: input_vault.to_account_info(),
                authority: ctx.accounts.trader.to_account_info(),
            },
        ),
        amount_in,
        input_mint.decimals,
    )?;

    if protocol_fee_to_vault > 0 {
        transfer_checked(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from: input_vault.to_account_info(),
                    mint: input_mint.to_account_info(),
                    to: ctx.accounts.protocol_fee_vault.to_account_info(),
                    authority: ctx.accounts.pool.to_account_info(),
                },
                &[pool_seeds],
            ),
            protocol_fee_to_vault,
            input_mint.decimals,
        )?;
    }

    if referrer_fee > 0 {
        if let Some(referrer) = &ctx.accounts.referrer_token_account {
            transfer_checked(
                CpiContext::new_with_signer(
                    ctx.accounts.token_program.to_account_info(),
                    TransferChecked {
                        from: input_vault.to_account_info(),
                        mint: input_mint.to_account_info(),
                        to: referrer.to_account_info(),
                        authority: ctx.accounts.pool.to_account_info(),
                    },
                    &[pool_seeds],
                ),
                referrer_fee,
                input_mint.decimals,
            )?;
        }
    }

    transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: output_vault.to_account_info(),
                mint: output_mint.to_account_info(),
                to: ctx.accounts.trader_destination.to_account_info(),
                authority: ctx.accounts.pool.to_account_info(),
            },
            &[pool_seeds],
        ),
        total_out,
        output_mint.decimals,
    )?;

    emit!(DlmmSwapExecuted {
        pool: ctx.accounts.pool.key(),
        trader: ctx.accounts.trader.key(),
        input_mint: input_mint_key,
        output_mint: output_mint_key,
        amount_in,
        amount_out: total_out,
        protocol_fee: total_protocol_fee,
        final_active_bin_id: active_bin_id,
        bins_crossed,
        referrer: ctx
            .accounts
            .referrer_token_account
            .as_ref()
            .map(|acc| acc.owner),
    });

    msg!(
        "Swap: in {} out {} ({} bins crossed)",
        amount_in,
        total_out,
        bins_crossed
    );

    Ok(())
}
