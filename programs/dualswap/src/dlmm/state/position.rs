use anchor_lang::prelude::*;

/// A liquidity range over contiguous bins, owned via a supply-1 position
/// token.
/// PDA: ["position", position_mint]
#[account]
#[derive(Debug, Default)]
pub struct RangePosition {
    /// Bump seed for PDA derivation
    pub bump: u8,

    pub pool: Pubkey,
    pub owner: Pubkey,

    /// Supply-1 mint proving ownership of this position
    pub position_mint: Pubkey,

    /// Range bounds, half-open: bins [lower, upper) in bin_step increments
    pub lower_bin_id: i32,
    pub upper_bin_id: i32,

    /// Token A units deposited per bin of the range
    pub liquidity_per_bin: u128,

    /// Max fee growth across the range's bins at the last settlement
    pub fee_growth_snapshot_a: u128,
    pub fee_growth_snapshot_b: u128,
}

impl RangePosition {
    pub const LEN: usize = 8 + // discriminator
        1 +                     // bump
        32 * 3 +                // pool, owner, position_mint
        4 * 2 +                 // bin range bounds
        16 +                    // liquidity_per_bin
        16 * 2; // fee growth snapshots
}
