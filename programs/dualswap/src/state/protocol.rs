use anchor_lang::prelude::*;

/// Global protocol configuration
/// PDA: ["protocol"]
///
/// Initialized exactly once; the stored authority gates official pool
/// creation, fee updates, and whitelist mutation.
#[account]
#[derive(Debug)]
pub struct ProtocolConfig {
    /// Master authority for admin actions (can be a multisig or DAO)
    pub authority: Pubkey,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl ProtocolConfig {
    pub const LEN: usize = 8 +  // discriminator
        32 +                     // authority
        1; // bump
}
