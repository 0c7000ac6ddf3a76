//! DualSwap - Twin Liquidity Engines on Solana
//!
//! One program hosting two exchange designs over a shared token boundary:
//!
//! - **Constant-product pools**: the classic x*y=k curve with LP tokens,
//!   lazy per-LP fee accrual, and a cumulative-price TWAP oracle
//! - **Discretized pools**: bin-indexed liquidity on a geometric price
//!   ladder, with range positions, a transaction bin cache protocol for
//!   multi-bin operations, and volatility-reactive fees
//!
//! ## Security
//!
//! - All arithmetic uses checked operations; 256-bit intermediates for
//!   mul-div
//! - Bin working sets are validated against PDA derivations before any
//!   state mutation
//! - Comprehensive account validation via Anchor

use anchor_lang::prelude::*;

pub mod amm;
pub mod constants;
pub mod dlmm;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use amm::instructions::*;
use amm::state::FeePreference;
use dlmm::instructions::*;
use instructions::*;
use state::{ParameterAction, ParameterList, PoolParameter};

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod dualswap {
    use super::*;

    // ═══════════════════════════════════════════════════════════════════════════
    // PROTOCOL ADMIN INSTRUCTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Initialize the protocol config; the signer becomes the authority
    pub fn initialize_protocol(ctx: Context<InitializeProtocol>) -> Result<()> {
        instructions::initialize_protocol::handler(ctx)
    }

    /// Create the DLMM parameter whitelist with its initial lists
    pub fn initialize_dlmm_parameters(
        ctx: Context<InitializeDlmmParameters>,
        official: Vec<PoolParameter>,
        community: Vec<PoolParameter>,
    ) -> Result<()> {
        instructions::initialize_dlmm_parameters::handler(ctx, official, community)
    }

    /// Add or remove a whitelisted (bin_step, fee_rate) pair
    pub fn update_dlmm_parameters(
        ctx: Context<UpdateDlmmParameters>,
        list: ParameterList,
        action: ParameterAction,
        parameter: PoolParameter,
    ) -> Result<()> {
        instructions::update_dlmm_parameters::handler(ctx, list, action, parameter)
    }

    /// Set a constant-product pool's swap fee
    pub fn update_amm_fees(ctx: Context<UpdateAmmFees>, new_fee_rate: Option<u16>) -> Result<()> {
        instructions::update_amm_fees::handler(ctx, new_fee_rate)
    }

    /// Set an official DLMM pool's fee, or recompute it from recent
    /// volatility when no rate is given
    pub fn update_dlmm_fees(
        ctx: Context<UpdateDlmmFees>,
        new_fee_rate: Option<u16>,
    ) -> Result<()> {
        instructions::update_dlmm_fees::handler(ctx, new_fee_rate)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // AMM INSTRUCTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Create a constant-product pool for an ordered mint pair
    ///
    /// # Arguments
    /// * `fee_rate` - Swap fee in basis points
    /// * `protocol_fee_share` - Share of the fee routed to the protocol, in
    ///   basis points of the fee
    /// * `referrer_fee_share` - Share carved out for referrers, in basis
    ///   points of the fee; must fit inside the protocol share
    pub fn create_amm_pool(
        ctx: Context<CreateAmmPool>,
        fee_rate: u16,
        protocol_fee_share: u16,
        referrer_fee_share: u16,
    ) -> Result<()> {
        amm::instructions::create_pool::handler(ctx, fee_rate, protocol_fee_share, referrer_fee_share)
    }

    /// Open an LP position on a constant-product pool
    pub fn open_amm_position(
        ctx: Context<OpenAmmPosition>,
        fee_preference: FeePreference,
    ) -> Result<()> {
        amm::instructions::open_position::handler(ctx, fee_preference)
    }

    /// Deposit into a constant-product pool and mint LP tokens
    ///
    /// # Arguments
    /// * `amount_a_desired` / `amount_b_desired` - Offered deposit amounts;
    ///   the smaller ratio side is clamped to the pool price
    /// * `min_lp_out` - Slippage bound on the LP tokens minted
    pub fn add_amm_liquidity(
        ctx: Context<AddAmmLiquidity>,
        amount_a_desired: u64,
        amount_b_desired: u64,
        min_lp_out: u64,
    ) -> Result<()> {
        amm::instructions::add_liquidity::handler(ctx, amount_a_desired, amount_b_desired, min_lp_out)
    }

    /// Burn LP tokens and withdraw the proportional reserves
    pub fn remove_amm_liquidity(
        ctx: Context<RemoveAmmLiquidity>,
        lp_to_burn: u64,
        min_amount_a: u64,
        min_amount_b: u64,
    ) -> Result<()> {
        amm::instructions::remove_liquidity::handler(ctx, lp_to_burn, min_amount_a, min_amount_b)
    }

    /// Swap against a constant-product pool
    pub fn swap_on_amm(ctx: Context<AmmSwap>, amount_in: u64, min_amount_out: u64) -> Result<()> {
        amm::instructions::swap::handler(ctx, amount_in, min_amount_out)
    }

    /// Claim accrued LP fees on a manual-claim position
    pub fn claim_lp_fees(ctx: Context<ClaimAmmFees>) -> Result<()> {
        amm::instructions::claim_fees::handler(ctx)
    }

    /// Convert accrued fees into LP tokens on an auto-compound position
    pub fn reinvest_lp_fees(ctx: Context<ReinvestAmmFees>) -> Result<()> {
        amm::instructions::reinvest_fees::handler(ctx)
    }

    /// Toggle a position between manual claiming and auto-compounding
    pub fn update_fee_preference(
        ctx: Context<UpdateFeePreference>,
        new_preference: FeePreference,
    ) -> Result<()> {
        instructions::update_fee_preference::handler(ctx, new_preference)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DLMM INSTRUCTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Create an official discretized pool (protocol authority only)
    pub fn create_dlmm_pool(
        ctx: Context<CreateDlmmPool>,
        bin_step: u16,
        fee_rate: u16,
        protocol_fee_share: u16,
        referrer_fee_share: u16,
        initial_bin_id: i32,
    ) -> Result<()> {
        dlmm::instructions::create_pool::handler(
            ctx,
            bin_step,
            fee_rate,
            protocol_fee_share,
            referrer_fee_share,
            initial_bin_id,
        )
    }

    /// Create a community discretized pool (permissionless)
    pub fn create_dlmm_community_pool(
        ctx: Context<CreateDlmmCommunityPool>,
        bin_step: u16,
        fee_rate: u16,
        protocol_fee_share: u16,
        referrer_fee_share: u16,
        initial_bin_id: i32,
    ) -> Result<()> {
        dlmm::instructions::create_community_pool::handler(
            ctx,
            bin_step,
            fee_rate,
            protocol_fee_share,
            referrer_fee_share,
            initial_bin_id,
        )
    }

    /// Initialize one bin account of a discretized pool
    pub fn initialize_bin(ctx: Context<InitializeBin>, bin_id: i32) -> Result<()> {
        dlmm::instructions::initialize_bin::handler(ctx, bin_id)
    }

    /// Register the ordered bin working set for the next bin operation
    pub fn populate_bin_cache(ctx: Context<PopulateBinCache>, bins: Vec<Pubkey>) -> Result<()> {
        instructions::populate_bin_cache::handler(ctx, bins)
    }

    /// Open an empty range position over [lower_bin_id, upper_bin_id)
    pub fn open_dlmm_position(
        ctx: Context<OpenDlmmPosition>,
        lower_bin_id: i32,
        upper_bin_id: i32,
    ) -> Result<()> {
        dlmm::instructions::open_position::handler(ctx, lower_bin_id, upper_bin_id)
    }

    /// Add uniform liquidity to the bins starting at `start_bin_id`; the
    /// first deposit narrows the position to the declared range
    pub fn add_dlmm_liquidity<'info>(
        ctx: Context<'_, '_, 'info, 'info, AddDlmmLiquidity<'info>>,
        start_bin_id: i32,
        liquidity_per_bin: u128,
        max_amount_a: u64,
        max_amount_b: u64,
    ) -> Result<()> {
        dlmm::instructions::add_liquidity::handler(
            ctx,
            start_bin_id,
            liquidity_per_bin,
            max_amount_a,
            max_amount_b,
        )
    }

    /// Withdraw liquidity plus accrued fees from a range position
    pub fn remove_dlmm_liquidity<'info>(
        ctx: Context<'_, '_, 'info, 'info, RemoveDlmmLiquidity<'info>>,
        liquidity_per_bin: u128,
        min_amount_a: u64,
        min_amount_b: u64,
    ) -> Result<()> {
        dlmm::instructions::remove_liquidity::handler(
            ctx,
            liquidity_per_bin,
            min_amount_a,
            min_amount_b,
        )
    }

    /// Move all liquidity from one range position into another
    pub fn modify_dlmm_liquidity<'info>(
        ctx: Context<'_, '_, 'info, 'info, ModifyDlmmLiquidity<'info>>,
        new_liquidity_per_bin: u128,
        min_surplus_a: u64,
        min_surplus_b: u64,
    ) -> Result<()> {
        dlmm::instructions::modify_liquidity::handler(
            ctx,
            new_liquidity_per_bin,
            min_surplus_a,
            min_surplus_b,
        )
    }

    /// Swap against a discretized pool, walking bins from the active bin
    pub fn dlmm_swap<'info>(
        ctx: Context<'_, '_, 'info, 'info, DlmmSwap<'info>>,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<()> {
        dlmm::instructions::swap::handler(ctx, amount_in, min_amount_out)
    }

    /// Burn an emptied range position and reclaim its rent
    pub fn burn_empty_dlmm_position(ctx: Context<BurnEmptyDlmmPosition>) -> Result<()> {
        dlmm::instructions::burn_empty_position::handler(ctx)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_id() {
        // Verify program ID matches
        assert_eq!(
            ID.to_string(),
            "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS"
        );
    }
}
