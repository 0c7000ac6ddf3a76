use crate::constants::{seeds, BASIS_POINT_MAX};
use crate::dlmm::state::{DiscretizedPool, PoolType};
use crate::errors::DualswapError;
use crate::events::DlmmPoolCreated;
use crate::state::{ParameterList, ParameterWhitelist, ProtocolConfig};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Create an official discretized pool. Only the protocol authority may do
/// this, and the (bin_step, fee_rate) pair must be on the official
/// whitelist.
#[derive(Accounts)]
#[instruction(bin_step: u16)]
pub struct CreateDlmmPool<'info> {
    #[account(
        seeds = [seeds::PROTOCOL_SEED],
        bump = protocol_config.bump,
        has_one = authority @ DualswapError::Unauthorized,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        seeds = [seeds::WHITELIST_SEED],
        bump = whitelist.bump,
    )]
    pub whitelist: Account<'info, ParameterWhitelist>,

    #[account(
        init,
        payer = authority,
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
        payer = authority,
        seeds = [seeds::VAULT_SEED, pool.key().as_ref(), mint_a.key().as_ref()],
        bump,
        token::mint = mint_a,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub vault_a: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        seeds = [seeds::VAULT_SEED, pool.key().as_ref(), mint_b.key().as_ref()],
        bump,
        token::mint = mint_b,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub vault_b: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        seeds = [seeds::FEE_VAULT_SEED, pool.key().as_ref(), mint_a.key().as_ref()],
        bump,
        token::mint = mint_a,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub protocol_fee_vault_a: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        seeds = [seeds::FEE_VAULT_SEED, pool.key().as_ref(), mint_b.key().as_ref()],
        bump,
        token::mint = mint_b,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub protocol_fee_vault_b: InterfaceAccount<'info, TokenAccount>,

    /// The protocol authority, also paying for account creation
    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Create official pool handler
pub fn handler(
    ctx: Context<CreateDlmmPool>,
    bin_step: u16,
    fee_rate: u16,
    protocol_fee_share: u16,
    referrer_fee_share: u16,
    initial_bin_id: i32,
) -> Result<()> {
    initialize_pool_state(
        &mut ctx.accounts.pool,
        &ctx.accounts.whitelist,
        ParameterList::Official,
        PoolType::Official,
        PoolAccounts {
            bump: ctx.bumps.pool,
            authority: ctx.accounts.authority.key(),
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

/// Keys gathered for pool initialization, shared with the community path.
pub struct PoolAccounts {
    pub bump: u8,
    pub authority: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
    pub protocol_fee_vault_a: Pubkey,
    pub protocol_fee_vault_b: Pubkey,
}

/// Validate parameters against the whitelist and write initial pool state.
pub fn initialize_pool_state(
    pool: &mut Account<DiscretizedPool>,
    whitelist: &ParameterWhitelist,
    list: ParameterList,
    pool_type: PoolType,
    accounts: PoolAccounts,
    bin_step: u16,
    fee_rate: u16,
    protocol_fee_share: u16,
    referrer_fee_share: u16,
    initial_bin_id: i32,
) -> Result<()> {
    require!(accounts.mint_a < accounts.mint_b, DualswapError::InvalidMintOrder);
    require!(
        whitelist.allows(list, bin_step, fee_rate),
        DualswapError::InvalidParameters
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
    require!(
        referrer_fee_share <= protocol_fee_share,
        DualswapError::FeeShareExceedsTotal
    );
    // The active bin must sit on the ladder.
    require!(
        initial_bin_id.rem_euclid(bin_step as i32) == 0,
        DualswapError::InvalidBinId
    );

    pool.bump = accounts.bump;
    pool.authority = accounts.authority;
    pool.pool_type = pool_type;
    pool.mint_a = accounts.mint_a;
    pool.mint_b = accounts.mint_b;
    pool.vault_a = accounts.vault_a;
    pool.vault_b = accounts.vault_b;
    pool.protocol_fee_vault_a = accounts.protocol_fee_vault_a;
    pool.protocol_fee_vault_b = accounts.protocol_fee_vault_b;
    pool.active_bin_id = initial_bin_id;
    pool.bin_step = bin_step;
    pool.fee_rate = fee_rate;
    pool.protocol_fee_share = protocol_fee_share;
    pool.referrer_fee_share = referrer_fee_share;
    pool.volatility_accumulator = 0;
    pool.last_fee_update_timestamp = Clock::get()?.unix_timestamp;
    pool.reserves_a = 0;
    pool.reserves_b = 0;

    emit!(DlmmPoolCreated {
        pool: pool.key(),
        mint_a: pool.mint_a,
        mint_b: pool.mint_b,
        bin_step,
        fee_rate,
    });

    msg!("DLMM pool created (bin step {} bps)", bin_step);

    Ok(())
}
