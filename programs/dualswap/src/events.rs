//! Events emitted by every mutating instruction.
//!
//! Each event names the affected pool, the acting owner or trader, and the
//! exact numeric deltas applied.

use crate::amm::state::FeePreference;
use crate::state::{ParameterAction, ParameterList};
use anchor_lang::prelude::*;

// ═══════════════════════════════════════════════════════════════════════════
// AMM EVENTS
// ═══════════════════════════════════════════════════════════════════════════

#[event]
pub struct AmmPoolCreated {
    pub pool: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub lp_mint: Pubkey,
    pub fee_rate: u16,
}

#[event]
pub struct AmmLiquidityAdded {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub lp_minted: u64,
    pub amount_a: u64,
    pub amount_b: u64,
}

#[event]
pub struct AmmLiquidityRemoved {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub lp_burned: u64,
    pub amount_a: u64,
    pub amount_b: u64,
}

#[event]
pub struct AmmSwapExecuted {
    pub pool: Pubkey,
    pub trader: Pubkey,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub amount_in: u64,
    pub amount_out: u64,
    pub protocol_fee: u64,
    pub lp_fee: u64,
    pub referrer: Option<Pubkey>,
}

#[event]
pub struct AmmFeesClaimed {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub fees_a: u64,
    pub fees_b: u64,
}

#[event]
pub struct AmmFeesReinvested {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub fees_a: u64,
    pub fees_b: u64,
    pub lp_minted: u64,
}

#[event]
pub struct AmmFeesUpdated {
    pub pool: Pubkey,
    pub new_fee_rate: u16,
}

#[event]
pub struct FeePreferenceUpdated {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub new_preference: FeePreference,
}

// ═══════════════════════════════════════════════════════════════════════════
// DLMM EVENTS
// ═══════════════════════════════════════════════════════════════════════════

#[event]
pub struct DlmmPoolCreated {
    pub pool: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub bin_step: u16,
    pub fee_rate: u16,
}

#[event]
pub struct DlmmPositionOpened {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub position: Pubkey,
    pub position_mint: Pubkey,
    pub lower_bin_id: i32,
    pub upper_bin_id: i32,
}

/// Emitted on both add and remove; `liquidity_delta` is signed.
#[event]
pub struct DlmmLiquidityChanged {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub position: Pubkey,
    pub liquidity_delta: i128,
    pub amount_a: u64,
    pub amount_b: u64,
}

#[event]
pub struct DlmmPositionRebalanced {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub old_position: Pubkey,
    pub new_position: Pubkey,
    pub liquidity_moved: u128,
    pub surplus_a: u64,
    pub surplus_b: u64,
}

#[event]
pub struct DlmmSwapExecuted {
    pub pool: Pubkey,
    pub trader: Pubkey,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub amount_in: u64,
    pub amount_out: u64,
    pub protocol_fee: u64,
    pub final_active_bin_id: i32,
    pub bins_crossed: u64,
    pub referrer: Option<Pubkey>,
}

#[event]
pub struct DlmmPositionBurned {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub position: Pubkey,
}

#[event]
pub struct DlmmFeesUpdated {
    pub pool: Pubkey,
    pub new_fee_rate: u16,
}

#[event]
pub struct DlmmParametersUpdated {
    pub list: ParameterList,
    pub action: ParameterAction,
    pub bin_step: u16,
    pub fee_rate: u16,
}
