use anchor_lang::prelude::*;

/// How a position's share of swap fees is settled
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum FeePreference {
    /// Fees are paid out only through claim_lp_fees
    ManualClaim,
    /// Fees compound into additional LP through reinvest_lp_fees
    AutoCompound,
}

impl Default for FeePreference {
    fn default() -> Self {
        FeePreference::ManualClaim
    }
}

/// One owner's LP stake in one AMM pool
/// PDA: ["amm_position", pool, owner], one position per (pool, owner)
#[account]
#[derive(Debug, Default)]
pub struct AmmPosition {
    /// The pool this position belongs to
    pub pool: Pubkey,

    /// Position owner; only this signer may mutate the position
    pub owner: Pubkey,

    /// LP tokens attributed to this position
    pub lp_amount: u64,

    /// Pool fee growth per LP token at the last settlement (token A).
    /// Always <= the pool's current accumulator.
    pub fee_growth_snapshot_a: u128,

    /// Pool fee growth per LP token at the last settlement (token B)
    pub fee_growth_snapshot_b: u128,

    /// How pending fees are settled
    pub fee_preference: FeePreference,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl AmmPosition {
    pub const LEN: usize = 8 +  // discriminator
        32 +                     // pool
        32 +                     // owner
        8 +                      // lp_amount
        16 * 2 +                 // fee growth snapshots
        1 +                      // fee_preference
        1; // bump
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_preference_wire_encoding() {
        // The preference is an instruction argument at open time, so its
        // Borsh discriminants are part of the wire format.
        assert_eq!(FeePreference::ManualClaim.try_to_vec().unwrap(), vec![0]);
        assert_eq!(FeePreference::AutoCompound.try_to_vec().unwrap(), vec![1]);
        assert_eq!(FeePreference::default(), FeePreference::ManualClaim);
    }
}
