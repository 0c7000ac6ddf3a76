use crate::amm::state::ConstantProductPool;
use crate::constants::{seeds, BASIS_POINT_MAX, LP_MINT_DECIMALS};
use crate::errors::DualswapError;
use crate::events::AmmPoolCreated;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Create a new constant-product pool for a mint pair
#[derive(Accounts)]
pub struct CreateAmmPool<'info> {
    /// The pool account to initialize
    #[account(
        init,
        payer = payer,
        space = ConstantProductPool::LEN,
        seeds = [
            seeds::AMM_POOL_SEED,
            mint_a.key().as_ref(),
            mint_b.key().as_ref(),
        ],
        bump
    )]
    pub pool: Account<'info, ConstantProductPool>,

    /// Token A mint (must be < token B mint lexicographically)
    pub mint_a: InterfaceAccount<'info, Mint>,

    /// Token B mint
    pub mint_b: InterfaceAccount<'info, Mint>,

    /// The LP mint, owned by the pool PDA
    #[account(
        init,
        payer = payer,
        seeds = [seeds::LP_MINT_SEED, pool.key().as_ref()],
        bump,
        mint::decimals = LP_MINT_DECIMALS,
        mint::authority = pool,
        mint::token_program = token_program,
    )]
    pub lp_mint: InterfaceAccount<'info, Mint>,

    /// Token A vault for the pool
    #[account(
        init,
        payer = payer,
        seeds = [seeds::VAULT_SEED, pool.key().as_ref(), mint_a.key().as_ref()],
        bump,
        token::mint = mint_a,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub vault_a: InterfaceAccount<'info, TokenAccount>,

    /// Token B vault for the pool
    #[account(
        init,
        payer = payer,
        seeds = [seeds::VAULT_SEED, pool.key().as_ref(), mint_b.key().as_ref()],
        bump,
        token::mint = mint_b,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub vault_b: InterfaceAccount<'info, TokenAccount>,

    /// Protocol fee vault for token A
    #[account(
        init,
        payer = payer,
        seeds = [seeds::FEE_VAULT_SEED, pool.key().as_ref(), mint_a.key().as_ref()],
        bump,
        token::mint = mint_a,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub protocol_fee_vault_a: InterfaceAccount<'info, TokenAccount>,

    /// Protocol fee vault for token B
    #[account(
        init,
        payer = payer,
        seeds = [seeds::FEE_VAULT_SEED, pool.key().as_ref(), mint_b.key().as_ref()],
        bump,
        token::mint = mint_b,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub protocol_fee_vault_b: InterfaceAccount<'info, TokenAccount>,

    /// The pool creator, recorded as pool authority
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,

    /// System program
    pub system_program: Program<'info, System>,
}

/// Create pool handler
pub fn handler(
    ctx: Context<CreateAmmPool>,
    fee_rate: u16,
    protocol_fee_share: u16,
    referrer_fee_share: u16,
) -> Result<()> {
    require!(
        ctx.accounts.mint_a.key() < ctx.accounts.mint_b.key(),
        DualswapError::InvalidMintOrder
    );

    require!(
        (fee_rate as u128) < BASIS_POINT_MAX,
        DualswapError::InvalidFeeRates
    );
    require!(
        (protocol_fee_share as u128) <= BASIS_POINT_MAX
            && (referrer_fee_share as u128) <= BASIS_POINT_MAX,
        DualswapError::InvalidFeeRates
    );
    // The referrer share is carved out of the protocol share, so both must
    // fit inside it together.
    require!(
        (referrer_fee_share as u128) <= (protocol_fee_share as u128),
        DualswapError::FeeShareExceedsTotal
    );

    let now = Clock::get()?.unix_timestamp;

    let pool = &mut ctx.accounts.pool;
    pool.bump = ctx.bumps.pool;
    pool.authority = ctx.accounts.payer.key();
    pool.mint_a = ctx.accounts.mint_a.key();
    pool.mint_b = ctx.accounts.mint_b.key();
    pool.vault_a = ctx.accounts.vault_a.key();
    pool.vault_b = ctx.accounts.vault_b.key();
    pool.lp_mint = ctx.accounts.lp_mint.key();
    pool.fee_rate = fee_rate;
    pool.protocol_fee_share = protocol_fee_share;
    pool.referrer_fee_share = referrer_fee_share;
    pool.protocol_fee_vault_a = ctx.accounts.protocol_fee_vault_a.key();
    pool.protocol_fee_vault_b = ctx.accounts.protocol_fee_vault_b.key();
    pool.reserves_a = 0;
    pool.reserves_b = 0;
    pool.fee_growth_per_lp_a = 0;
    pool.fee_growth_per_lp_b = 0;
    pool.price_a_cumulative = 0;
    pool.price_b_cumulative = 0;
    pool.last_update_timestamp = now;
    pool.last_fee_update_timestamp = now;
    pool.price_a_cumulative_at_last_fee_update = 0;

    emit!(AmmPoolCreated {
        pool: pool.key(),
        mint_a: pool.mint_a,
        mint_b: pool.mint_b,
        lp_mint: pool.lp_mint,
        fee_rate,
    });

    msg!("AMM pool created");
    msg!("Mint A: {}", pool.mint_a);
    msg!("Mint B: {}", pool.mint_b);
    msg!("Fee rate: {} bps", fee_rate);

    Ok(())
}
