// DualSwap Protocol Constants

/// Basis point denominator (10000 = 100%)
pub const BASIS_POINT_MAX: u128 = 10_000;

/// Fixed-point scale for fee growth accumulators and bin prices (10^12)
pub const PRECISION: u128 = 1_000_000_000_000;

/// Fixed-point scale for the TWAP oracle price accumulators (10^9)
pub const ORACLE_PRECISION: u128 = 1_000_000_000;

/// Maximum number of bins a single range position may cover
pub const MAX_BINS_PER_POSITION: i32 = 70;

/// Maximum number of bin keys a TransactionBinCache can hold.
/// Matches MAX_BINS_PER_POSITION so a whole position fits in one cache.
pub const MAX_CACHED_BINS: usize = 70;

/// Maximum entries per whitelist (official or community)
pub const MAX_WHITELIST_ENTRIES: usize = 32;

/// Decimals of AMM LP mints
pub const LP_MINT_DECIMALS: u8 = 6;

/// Minimum seconds between automated DLMM fee updates
pub const FEE_UPDATE_COOLDOWN_SECS: i64 = 3600;

/// Base fee used by the automated DLMM fee update, in basis points (0.1%)
pub const DYNAMIC_BASE_FEE_BPS: u16 = 10;

/// Cap on the volatility component of the automated fee, in basis points (0.9%)
pub const DYNAMIC_FEE_CAP_BPS: u16 = 90;

/// Account seeds for PDA derivation
pub mod seeds {
    pub const PROTOCOL_SEED: &[u8] = b"protocol";
    pub const WHITELIST_SEED: &[u8] = b"whitelist";
    pub const AMM_POOL_SEED: &[u8] = b"amm_pool";
    pub const AMM_POSITION_SEED: &[u8] = b"amm_position";
    pub const LP_MINT_SEED: &[u8] = b"lp_mint";
    pub const DLMM_POOL_SEED: &[u8] = b"dlmm_pool";
    pub const BIN_SEED: &[u8] = b"bin";
    pub const POSITION_SEED: &[u8] = b"position";
    pub const BIN_CACHE_SEED: &[u8] = b"bin_cache";
    pub const VAULT_SEED: &[u8] = b"vault";
    pub const FEE_VAULT_SEED: &[u8] = b"fee_vault";
}
