use crate::constants::MAX_WHITELIST_ENTRIES;
use anchor_lang::prelude::*;

/// One allowed (bin_step, fee_rate) pairing for DLMM pool creation
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct PoolParameter {
    /// Basis-point spacing between adjacent bin prices
    pub bin_step: u16,
    /// Swap fee in basis points
    pub fee_rate: u16,
}

/// Which whitelist a parameter update targets
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParameterList {
    Official,
    Community,
}

/// Whether a parameter update inserts or deletes an entry
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParameterAction {
    Add,
    Remove,
}

/// Governance-curated (bin_step, fee_rate) pairs gating DLMM pool creation
/// PDA: ["whitelist"]
#[account]
#[derive(Debug)]
pub struct ParameterWhitelist {
    /// Authority allowed to mutate the lists
    pub authority: Pubkey,

    /// Pairs allowed for official (authority-created) pools
    pub official: Vec<PoolParameter>,

    /// Pairs allowed for permissionless community pools
    pub community: Vec<PoolParameter>,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl ParameterWhitelist {
    pub const LEN: usize = 8 +                            // discriminator
        32 +                                               // authority
        (4 + 4 * MAX_WHITELIST_ENTRIES) +                  // official
        (4 + 4 * MAX_WHITELIST_ENTRIES) +                  // community
        1; // bump

    /// Whether a pairing is allowed on the given list
    pub fn allows(&self, list: ParameterList, bin_step: u16, fee_rate: u16) -> bool {
        let entries = match list {
            ParameterList::Official => &self.official,
            ParameterList::Community => &self.community,
        };
        entries
            .iter()
            .any(|p| p.bin_step == bin_step && p.fee_rate == fee_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist() -> ParameterWhitelist {
        ParameterWhitelist {
            authority: Pubkey::default(),
            official: vec![PoolParameter {
                bin_step: 20,
                fee_rate: 30,
            }],
            community: vec![PoolParameter {
                bin_step: 100,
                fee_rate: 100,
            }],
            bump: 255,
        }
    }

    #[test]
    fn test_allows_matching_entry() {
        let wl = whitelist();
        assert!(wl.allows(ParameterList::Official, 20, 30));
        assert!(wl.allows(ParameterList::Community, 100, 100));
    }

    #[test]
    fn test_rejects_wrong_list() {
        let wl = whitelist();
        assert!(!wl.allows(ParameterList::Community, 20, 30));
        assert!(!wl.allows(ParameterList::Official, 100, 100));
    }

    #[test]
    fn test_rejects_partial_match() {
        let wl = whitelist();
        assert!(!wl.allows(ParameterList::Official, 20, 31));
        assert!(!wl.allows(ParameterList::Official, 25, 30));
    }
}
