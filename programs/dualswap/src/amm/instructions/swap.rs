use crate::amm::math::swap_quote;
use crate::amm::state::ConstantProductPool;
use crate::constants::{seeds, BASIS_POINT_MAX};
use crate::errors::DualswapError;
use crate::events::AmmSwapExecuted;
use crate::math::{mul_div, to_u64};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

/// Swap against a constant-product pool
#[derive(Accounts)]
pub struct AmmSwap<'info> {
    #[account(
        mut,
        seeds = [seeds::AMM_POOL_SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
        has_one = vault_a @ DualswapError::InvalidVault,
        has_one = vault_b @ DualswapError::InvalidVault,
        has_one = lp_mint @ DualswapError::InvalidMint,
    )]
    pub pool: Account<'info, ConstantProductPool>,

    #[account(constraint = mint_a.key() == pool.mint_a @ DualswapError::InvalidMint)]
    pub mint_a: InterfaceAccount<'info, Mint>,

    #[account(constraint = mint_b.key() == pool.mint_b @ DualswapError::InvalidMint)]
    pub mint_b: InterfaceAccount<'info, Mint>,

    /// LP mint, read for the current supply when folding in LP fees
    pub lp_mint: InterfaceAccount<'info, Mint>,

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

    /// Optional referrer token account on the input side. When present, the
    /// referrer share is carved out of the protocol fee.
    #[account(mut)]
    pub referrer_token_account: Option<InterfaceAccount<'info, TokenAccount>>,

    pub trader: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Swap handler
pub fn handler(ctx: Context<AmmSwap>, amount_in: u64, min_amount_out: u64) -> Result<()> {
    require!(amount_in > 0, DualswapError::ZeroAmount);

    let pool = &ctx.accounts.pool;
    let a_to_b = if ctx.accounts.trader_source.mint == pool.mint_a {
        true
    } else if ctx.accounts.trader_source.mint == pool.mint_b {
        false
    } else {
        return err!(DualswapError::InvalidMint);
    };

    let (input_mint_key, output_mint_key) = if a_to_b {
        (pool.mint_a, pool.mint_b)
    } else {
        (pool.mint_b, pool.mint_a)
    };
    require!(
        ctx.accounts.trader_destination.mint == output_mint_key,
        DualswapError::InvalidMint
    );

    let expected_fee_vault = if a_to_b {
        pool.protocol_fee_vault_a
    } else {
        pool.protocol_fee_vault_b
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

    let (source_reserves, destination_reserves) = if a_to_b {
        (pool.reserves_a, pool.reserves_b)
    } else {
        (pool.reserves_b, pool.reserves_a)
    };

    let quote = swap_quote(
        amount_in,
        source_reserves,
        destination_reserves,
        pool.fee_rate,
        pool.protocol_fee_share,
    )?;
    require!(
        quote.amount_out >= min_amount_out,
        DualswapError::SlippageExceeded
    );
    require!(
        quote.amount_out < destination_reserves,
        DualswapError::InsufficientLiquidityForSwap
    );

    let referrer_fee = if ctx.accounts.referrer_token_account.is_some() {
        to_u64(mul_div(
            quote.protocol_fee as u128,
            pool.referrer_fee_share as u128,
            BASIS_POINT_MAX,
        )?)?
    } else {
        0
    };
    let protocol_fee_to_vault = quote
        .protocol_fee
        .checked_sub(referrer_fee)
        .ok_or(DualswapError::MathOverflow)?;

    let mint_a_key = pool.mint_a;
    let mint_b_key = pool.mint_b;
    let pool_bump = pool.bump;
    let lp_supply = ctx.accounts.lp_mint.supply;
    let now = Clock::get()?.unix_timestamp;

    {
        let pool = &mut ctx.accounts.pool;
        // Accumulate the pre-trade price first, then move reserves. The
        // protocol fee never enters the pool; the LP fee stays behind.
        pool.update_oracle(now)?;

        let retained = amount_in
            .checked_sub(quote.protocol_fee)
            .ok_or(DualswapError::MathOverflow)?;
        if a_to_b {
            pool.reserves_a = pool
                .reserves_a
                .checked_add(retained)
                .ok_or(DualswapError::MathOverflow)?;
            pool.reserves_b = pool
                .reserves_b
                .checked_sub(quote.amount_out)
                .ok_or(DualswapError::MathOverflow)?;
        } else {
            pool.reserves_b = pool
                .reserves_b
                .checked_add(retained)
                .ok_or(DualswapError::MathOverflow)?;
            pool.reserves_a = pool
                .reserves_a
                .checked_sub(quote.amount_out)
                .ok_or(DualswapError::MathOverflow)?;
        }
        pool.accrue_lp_fee(quote.lp_fee, lp_supply, a_to_b)?;
    }

    let (input_mint, output_mint, input_vault, output_vault) = if a_to_b {
        (
            &ctx.accounts.mint_a,
            &ctx.accounts.mint_b,
            &ctx.accounts.vault_a,
            &ctx.accounts.vault_b,
        )
    } else {
        (
            &ctx.accounts.mint_b,
            &ctx.accounts.mint_a,
            &ctx.accounts.vault_b,
            &ctx.accounts.vault_a,
        )
    };

    let pool_seeds: &[&[u8]] = &[
        seeds::AMM_POOL_SEED,
        mint_a_key.as_ref(),
        mint_b_key.as_ref(),
        &[pool_bump],
    ];

    // Pull the full input into the vault, then route the fee carve-outs.
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
        quote.amount_out,
        output_mint.decimals,
    )?;

    emit!(AmmSwapExecuted {
        pool: ctx.accounts.pool.key(),
        trader: ctx.accounts.trader.key(),
        input_mint: input_mint_key,
        output_mint: output_mint_key,
        amount_in,
        amount_out: quote.amount_out,
        protocol_fee: quote.protocol_fee,
        lp_fee: quote.lp_fee,
        referrer: ctx
            .accounts
            .referrer_token_account
            .as_ref()
            .map(|acc| acc.owner),
    });

    msg!(
        "Swap: in {} out {} (protocol fee {}, lp fee {})",
        amount_in,
        quote.amount_out,
        quote.protocol_fee,
        quote.lp_fee
    );

    Ok(())
}
