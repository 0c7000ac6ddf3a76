//! Transaction bin cache protocol.
//!
//! A bin-range operation may touch an unbounded number of bin accounts, but
//! an instruction's fixed account list cannot name them all up front. The
//! caller first registers the ordered working set here (populate_bin_cache),
//! then passes the same accounts as the trailing account list of the
//! consuming instruction. Before any state is mutated, the engine re-derives
//! the expected bin addresses from pool parameters and requires the supplied
//! list, the cached list, and the derived list to be equal element by
//! element. A caller can therefore never substitute unrelated or stale bin
//! accounts.

use crate::constants::{seeds, MAX_CACHED_BINS};
use crate::errors::DualswapError;
use anchor_lang::prelude::*;

/// Ephemeral per-owner scratch record listing the bins an upcoming operation
/// will touch
/// PDA: ["bin_cache", owner]
///
/// Holds at most one intended working set at a time; it must be repopulated
/// before each bin-touching call whose bin set differs from the previous one.
#[account]
#[derive(Debug)]
pub struct TransactionBinCache {
    /// Owner of the cache; only this signer's operations may consume it
    pub owner: Pubkey,

    /// Ordered bin addresses the next operation will touch
    pub bins: Vec<Pubkey>,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl TransactionBinCache {
    pub const LEN: usize = 8 +                 // discriminator
        32 +                                    // owner
        (4 + 32 * MAX_CACHED_BINS) +            // bins
        1; // bump
}

/// Derive the address of the bin account for (pool, bin_id)
pub fn derive_bin_address(pool: &Pubkey, bin_id: i32) -> Pubkey {
    Pubkey::find_program_address(
        &[seeds::BIN_SEED, pool.as_ref(), &bin_id.to_le_bytes()],
        &crate::ID,
    )
    .0
}

/// Enumerate `count` bin ids starting at `start`, advancing by `step`
/// (negative for a downward walk). Fails on i32 overflow.
pub fn enumerate_bin_ids(start: i32, count: usize, step: i32) -> Result<Vec<i32>> {
    let mut ids = Vec::with_capacity(count);
    let mut id = start;
    for i in 0..count {
        ids.push(id);
        if i + 1 < count {
            id = id.checked_add(step).ok_or(DualswapError::MathOverflow)?;
        }
    }
    Ok(ids)
}

/// Ordered, total equality check between the cached list, the supplied list,
/// and the derivation-based expectation.
///
/// Length or address divergence from the cache is BinCacheMismatch; address
/// divergence from the derived expectation is InvalidBinAccount.
pub fn check_bin_lists(cached: &[Pubkey], supplied: &[Pubkey], expected: &[Pubkey]) -> Result<()> {
    require!(supplied.len() == cached.len(), DualswapError::BinCacheMismatch);
    require!(
        supplied.len() == expected.len(),
        DualswapError::InvalidBinCount
    );
    for ((supplied_key, cached_key), expected_key) in
        supplied.iter().zip(cached.iter()).zip(expected.iter())
    {
        require_keys_eq!(*supplied_key, *cached_key, DualswapError::BinCacheMismatch);
        require_keys_eq!(
            *supplied_key,
            *expected_key,
            DualswapError::InvalidBinAccount
        );
    }
    Ok(())
}

/// Validate the trailing bin accounts of an instruction against the cache and
/// the bin ids the operation requires, in order. Also requires every bin
/// account to be owned by this program.
pub fn verify_bin_accounts(
    cache: &TransactionBinCache,
    supplied: &[AccountInfo],
    pool: &Pubkey,
    bin_ids: &[i32],
) -> Result<()> {
    let supplied_keys: Vec<Pubkey> = supplied.iter().map(|info| info.key()).collect();
    let expected: Vec<Pubkey> = bin_ids
        .iter()
        .map(|id| derive_bin_address(pool, *id))
        .collect();
    check_bin_lists(&cache.bins, &supplied_keys, &expected)?;
    for info in supplied {
        require_keys_eq!(*info.owner, crate::ID, DualswapError::InvalidBinAccount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<Pubkey> {
        (0..n).map(|_| Pubkey::new_unique()).collect()
    }

    #[test]
    fn test_enumerate_upward() {
        assert_eq!(enumerate_bin_ids(-40, 3, 20).unwrap(), vec![-40, -20, 0]);
    }

    #[test]
    fn test_enumerate_downward() {
        assert_eq!(enumerate_bin_ids(0, 3, -20).unwrap(), vec![0, -20, -40]);
    }

    #[test]
    fn test_enumerate_overflow() {
        assert!(enumerate_bin_ids(i32::MAX - 1, 3, 20).is_err());
    }

    #[test]
    fn test_check_equal_lists() {
        let ks = keys(3);
        assert!(check_bin_lists(&ks, &ks, &ks).is_ok());
    }

    #[test]
    fn test_check_rejects_shorter_supplied_list() {
        let ks = keys(3);
        assert!(check_bin_lists(&ks, &ks[..2], &ks).is_err());
    }

    #[test]
    fn test_check_rejects_reordered_list() {
        let ks = keys(3);
        let mut reordered = ks.clone();
        reordered.swap(0, 2);
        assert!(check_bin_lists(&ks, &reordered, &ks).is_err());
    }

    #[test]
    fn test_check_rejects_substituted_expectation() {
        let ks = keys(3);
        let mut expected = ks.clone();
        expected[1] = Pubkey::new_unique();
        assert!(check_bin_lists(&ks, &ks, &expected).is_err());
    }

    #[test]
    fn test_derive_bin_address_is_deterministic() {
        let pool = Pubkey::new_unique();
        assert_eq!(derive_bin_address(&pool, -20), derive_bin_address(&pool, -20));
        assert_ne!(derive_bin_address(&pool, -20), derive_bin_address(&pool, 20));
    }
}
