use crate::constants::seeds;
use crate::dlmm::instructions::create_pool::{initialize_pool_state, PoolAccounts};
use crate::dlmm::state::{DiscretizedPool, PoolType};
use crate::state::{ParameterList, ParameterWhitelist};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Create a community discretized pool. Permissionless, but the
/// (bin_step, fee_rate) pair must be on the community whitelist.
#[derive(Accounts)]
#[instruction(bin_step: u16)]
pub struct CreateDlmmCommunityPool<'info> {
    #[account(
        seeds = [seeds::WHITELIST_SEED],
        bump = whitelist.bump,
    )]
    pub whitelist: Account<'info, ParameterWhitelist>,

    #[account(
        init,
        payer = payer,
        space = DiscretizedPool::LEN,
        seeds = [
            seeds::DLMM_POOL_SEED,
            mint_a.key().as_ref(),
            mint_b.key().as_ref(),
            &bin_step.to_le_bytes(),
        ],
        bump
    )]
    pub pool: Account<'info, DiscretizedPool>,

    /// Token A mint (must be < token B mint lexicographically)
    pub mint_a: InterfaceAccount<'info, Mint>,

    /// Token B mint
    pub mint_b: InterfaceAccount<'info, Mint>,

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

    /// The pool creator
    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Create community pool handler
pub fn handler(
    ctx: Context<CreateDlmmCommunityPool>,
    bin_step: u16,
    fee_rate: u16,
    protocol_fee_share: u16,
    referrer_fee_share: u16,
    initial_bin_id: i32,
) -> Result<()> {
    initialize_pool_state(
        &mut ctx.accounts.pool,
        &ctx.accounts.whitelist,
        ParameterList::Community,
        PoolType::Community,
        PoolAccounts {
            bump: ctx.bumps.pool,
            authority: ctx.accounts.payer.key(),
            mint_a: ctx.accounts.mint_a.key(),
            mint_b: ctx.accounts.mint_b.key(),
            vault_a: ctx.accounts.vault_a.key(),
            vault_b: ctx.accounts.vault_b.key(),
            protocol_fee_vault_a: ctx.accounts.protocol_fee_vault_a.key(),
            protocol_fee_vault_b: ctx.accounts.protocol_fee_vault_b.key(),
        },
        bin_step,
        fee_rate,
        protocol_fee_share,
        referrer_fee_share,
        initial_bin_id,
    )
}
