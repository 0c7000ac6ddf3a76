use crate::amm::math::{deposit_quote, pending_fees};
use crate::amm::state::{AmmPosition, ConstantProductPool, FeePreference};
use crate::constants::seeds;
use crate::errors::DualswapError;
use crate::events::AmmFeesReinvested;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{mint_to, Mint, MintTo, TokenAccount, TokenInterface};

/// Convert accrued fees into additional LP tokens on an auto-compound
/// position. The fees already sit in the pool vaults, so the only movement
/// is an LP mint.
#[derive(Accounts)]
pub struct ReinvestAmmFees<'info> {
    #[account(
        mut,
        seeds = [seeds::AMM_POOL_SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
        has_one = lp_mint @ DualswapError::InvalidMint,
    )]
    pub pool: Account<'info, ConstantProductPool>,

    #[account(
        mut,
        seeds = [seeds::AMM_POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        has_one = owner @ DualswapError::Unauthorized,
        constraint = position.pool == pool.key() @ DualswapError::InvalidPool,
        constraint = position.fee_preference == FeePreference::AutoCompound
            @ DualswapError::InvalidFeePreference,
    )]
    pub position: Account<'info, AmmPosition>,

    #[account(mut)]
    pub lp_mint: InterfaceAccount<'info, Mint>,

    /// The position owner's LP token account
    #[account(mut)]
    pub owner_lp_token: InterfaceAccount<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Reinvest fees handler
pub fn handler(ctx: Context<ReinvestAmmFees>) -> Result<()> {
    let (fees_a, fees_b) = pending_fees(
        ctx.accounts.pool.fee_growth_per_lp_a,
        ctx.accounts.pool.fee_growth_per_lp_b,
        ctx.accounts.position.fee_growth_snapshot_a,
        ctx.accounts.position.fee_growth_snapshot_b,
        ctx.accounts.position.lp_amount,
    )?;
    require!(fees_a > 0 || fees_b > 0, DualswapError::ZeroAmount);

    let lp_supply = ctx.accounts.lp_mint.supply;
    let quote = deposit_quote(
        ctx.accounts.pool.reserves_a,
        ctx.accounts.pool.reserves_b,
        lp_supply,
        fees_a,
        fees_b,
    )?;
    require!(quote.lp_to_mint > 0, DualswapError::ZeroLiquidity);

    ctx.accounts.position.fee_growth_snapshot_a = ctx.accounts.pool.fee_growth_per_lp_a;
    ctx.accounts.position.fee_growth_snapshot_b = ctx.accounts.pool.fee_growth_per_lp_b;
    {
        let position = &mut ctx.accounts.position;
        position.lp_amount = position
            .lp_amount
            .checked_add(quote.lp_to_mint)
            .ok_or(DualswapError::MathOverflow)?;
    }

    let mint_a_key = ctx.accounts.pool.mint_a;
    let mint_b_key = ctx.accounts.pool.mint_b;
    let pool_bump = ctx.accounts.pool.bump;
    let pool_seeds: &[&[u8]] = &[
        seeds::AMM_POOL_SEED,
        mint_a_key.as_ref(),
        mint_b_key.as_ref(),
        &[pool_bump],
    ];

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
        quote.lp_to_mint,
    )?;

    emit!(AmmFeesReinvested {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.owner.key(),
        fees_a,
        fees_b,
        lp_minted: quote.lp_to_mint,
    });

    Ok(())
}
