use anchor_lang::prelude::*;

/// One price bin of a discretized pool (zero-copy)
/// PDA: ["bin", pool, bin_id_le]
#[account(zero_copy)]
#[repr(C)]
#[derive(Debug, Default)]
pub struct Bin {
    /// Liquidity deposited into this bin, denominated in token A units
    pub liquidity: u128,
    /// Cumulative token A fees per liquidity unit, scaled by PRECISION
    pub fee_growth_per_unit_a: u128,
    /// Cumulative token B fees per liquidity unit, scaled by PRECISION
    pub fee_growth_per_unit_b: u128,
    /// This bin's id; a multiple of the pool's bin_step
    pub bin_id: i32,
    /// Explicit padding so the struct has no implicit tail bytes
    pub _padding: [u8; 12],
}

impl Bin {
    pub const LEN: usize = 8 + // discriminator
        16 * 3 +                // liquidity + fee growth accumulators
        4 +                     // bin_id
        12; // padding
}
