use anchor_lang::prelude::*;

/// Whether a pool's (bin_step, fee_rate) pair came from the official or the
/// community whitelist. Official pools feed the automated fee controller.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PoolType {
    #[default]
    Official,
    Community,
}

/// Discretized (bin-indexed) liquidity pool state
/// PDA: ["dlmm_pool", mint_a, mint_b, bin_step_le] with mint_a < mint_b
#[account]
#[derive(Debug, Default)]
pub struct DiscretizedPool {
    /// Bump seed for PDA derivation
    pub bump: u8,

    /// The pool creator
    pub authority: Pubkey,

    /// Official or community provenance
    pub pool_type: PoolType,

    // === Mint and vault keys ===
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
    pub protocol_fee_vault_a: Pubkey,
    pub protocol_fee_vault_b: Pubkey,

    // === Price ladder ===
    /// Bin id currently holding both assets. Always a multiple of bin_step.
    pub active_bin_id: i32,
    /// Basis-point spacing between adjacent bins
    pub bin_step: u16,

    // === Fee parameters (basis points) ===
    pub fee_rate: u16,
    pub protocol_fee_share: u16,
    pub referrer_fee_share: u16,

    // === Volatility tracking ===
    /// Bins crossed by swaps since the last fee update
    pub volatility_accumulator: u64,
    /// Timestamp of the last fee-rate change
    pub last_fee_update_timestamp: i64,

    // === Liquidity state ===
    pub reserves_a: u64,
    pub reserves_b: u64,
}

impl DiscretizedPool {
    pub const LEN: usize = 8 + // discriminator
        1 +                     // bump
        32 +                    // authority
        1 +                     // pool_type
        32 * 6 +                // mints, vaults, fee vaults
        4 +                     // active_bin_id
        2 +                     // bin_step
        2 * 3 +                 // fee_rate, protocol_fee_share, referrer_fee_share
        8 +                     // volatility_accumulator
        8 +                     // last_fee_update_timestamp
        8 * 2; // reserves
}
