//! Bin-indexed liquidity math
//!
//! Prices follow a geometric ladder: bin `i` trades at
//! `(1 + bin_step/10000)^i`, fixed-point scaled by PRECISION. Bin liquidity
//! is denominated in token A units; the token B capacity of a bin is
//! `liquidity * price / PRECISION`. A pool's composition is implied by the
//! active bin: bins above it hold token A, bins below it hold token B, the
//! active bin holds both.

use crate::constants::{BASIS_POINT_MAX, MAX_BINS_PER_POSITION, PRECISION};
use crate::errors::DualswapError;
use crate::math::{mul_div, to_u64};
use anchor_lang::prelude::*;

/// Direction of a swap through the bin ladder. `AForB` consumes token B
/// capacity and walks the active bin downward; `BForA` walks upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    AForB,
    BForA,
}

impl SwapDirection {
    /// Signed bin-id increment applied after a bin is drained.
    pub fn id_step(&self, bin_step: u16) -> i32 {
        match self {
            SwapDirection::AForB => -(bin_step as i32),
            SwapDirection::BForA => bin_step as i32,
        }
    }
}

/// Outcome of consuming a single bin during a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinSwapStep {
    /// Gross input consumed, fee included
    pub amount_in_consumed: u64,
    /// Output produced from this bin
    pub amount_out: u64,
    /// Fee share leaving the pool
    pub protocol_fee: u64,
    /// Fee share accrued to the bin's liquidity providers
    pub lp_fee: u64,
    /// True when the bin's capacity is fully drained
    pub exhausted: bool,
}

/// Fixed-point price of bin `bin_id` for the given step, scaled by PRECISION.
pub fn price_at_bin(bin_id: i32, bin_step: u16) -> Result<u128> {
    require!(bin_step > 0, DualswapError::InvalidBinStep);

    let ratio = PRECISION
        .checked_add(mul_div(bin_step as u128, PRECISION, BASIS_POINT_MAX)?)
        .ok_or(DualswapError::MathOverflow)?;

    let magnitude = bin_id.unsigned_abs();
    let price = power_fp(ratio, magnitude)?;

    if bin_id < 0 {
        // price(-i) = 1 / price(i)
        mul_div(PRECISION, PRECISION, price)
    } else {
        Ok(price)
    }
}

/// Fixed-point exponentiation by squaring. `base` is scaled by PRECISION.
fn power_fp(base: u128, mut exp: u32) -> Result<u128> {
    let mut result = PRECISION;
    let mut acc = base;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_div(result, acc, PRECISION)?;
        }
        exp >>= 1;
        if exp > 0 {
            acc = mul_div(acc, acc, PRECISION)?;
        }
    }
    Ok(result)
}

/// Token B capacity of a bin holding `liquidity` token A units at `price`.
pub fn bin_capacity_b(liquidity: u128, price: u128) -> Result<u128> {
    mul_div(liquidity, price, PRECISION)
}

/// Number of bins in the half-open range `[lower, upper)`.
///
/// Both bounds must be multiples of `bin_step` and the range must cover at
/// least one bin and at most MAX_BINS_PER_POSITION.
pub fn bins_in_range(lower_bin_id: i32, upper_bin_id: i32, bin_step: u16) -> Result<i32> {
    require!(bin_step > 0, DualswapError::InvalidBinStep);
    require!(upper_bin_id > lower_bin_id, DualswapError::InvalidBinRange);

    let step = bin_step as i32;
    require!(
        lower_bin_id.rem_euclid(step) == 0 && upper_bin_id.rem_euclid(step) == 0,
        DualswapError::InvalidBinId
    );

    let count = upper_bin_id
        .checked_sub(lower_bin_id)
        .ok_or(DualswapError::MathOverflow)?
        / step;
    require!(count <= MAX_BINS_PER_POSITION, DualswapError::RangeTooWide);
    Ok(count)
}

/// Deposit amounts required to supply `liquidity` token A units to one bin,
/// given the pool's active bin.
pub fn amounts_for_bin(
    bin_id: i32,
    active_bin_id: i32,
    price: u128,
    liquidity: u128,
) -> Result<(u64, u64)> {
    if bin_id > active_bin_id {
        // Above the active price: held entirely as token A.
        Ok((to_u64(liquidity)?, 0))
    } else if bin_id < active_bin_id {
        // Below the active price: held entirely as token B.
        Ok((0, to_u64(bin_capacity_b(liquidity, price)?)?))
    } else {
        // The active bin quotes both sides at full capacity, so the deposit
        // funds both sides in full. Either side can be drained entirely by a
        // swap without touching other bins' balances.
        Ok((
            to_u64(liquidity)?,
            to_u64(bin_capacity_b(liquidity, price)?)?,
        ))
    }
}

/// Fees claimable from one bin: liquidity times the growth since the
/// position's snapshot. Snapshots are taken as the max across a position's
/// bins, so an individual bin may sit below the snapshot; it then owes
/// nothing.
pub fn accrued_bin_fees(fee_growth: u128, snapshot: u128, liquidity: u128) -> Result<u64> {
    to_u64(mul_div(
        fee_growth.saturating_sub(snapshot),
        liquidity,
        PRECISION,
    )?)
}

/// Per-unit-liquidity fee growth delta produced by `lp_fee` landing on a bin
/// with `liquidity` units.
pub fn fee_growth_delta(lp_fee: u64, liquidity: u128) -> Result<u128> {
    if liquidity == 0 {
        return Ok(0);
    }
    mul_div(lp_fee as u128, PRECISION, liquidity)
}

/// Consume as much of `remaining_in` as one bin allows.
///
/// The fee is charged on the input. A fully drained bin reports the gross
/// input `capacity_in * BASIS_POINT_MAX / (BASIS_POINT_MAX - fee_rate)` so
/// the fee scales with what was actually consumed.
pub fn compute_bin_swap(
    direction: SwapDirection,
    liquidity: u128,
    price: u128,
    remaining_in: u64,
    fee_rate: u16,
    protocol_fee_share: u16,
) -> Result<BinSwapStep> {
    let fee_on_remaining = mul_div(remaining_in as u128, fee_rate as u128, BASIS_POINT_MAX)?;
    let net_in = (remaining_in as u128)
        .checked_sub(fee_on_remaining)
        .ok_or(DualswapError::MathOverflow)?;

    // Output capacity of the bin and the net input that drains it.
    let (capacity_out, input_to_drain) = match direction {
        SwapDirection::AForB => {
            let b_available = bin_capacity_b(liquidity, price)?;
            (b_available, mul_div(b_available, PRECISION, price)?)
        }
        SwapDirection::BForA => (liquidity, bin_capacity_b(liquidity, price)?),
    };

    let (gross_in, amount_out, fee_paid, exhausted) = if net_in >= input_to_drain {
        let gross = mul_div(
            input_to_drain,
            BASIS_POINT_MAX,
            BASIS_POINT_MAX
                .checked_sub(fee_rate as u128)
                .ok_or(DualswapError::MathOverflow)?,
        )?;
        let fee = gross
            .checked_sub(input_to_drain)
            .ok_or(DualswapError::MathOverflow)?;
        (gross, capacity_out, fee, true)
    } else {
        let out = match direction {
            SwapDirection::AForB => mul_div(net_in, price, PRECISION)?,
            SwapDirection::BForA => mul_div(net_in, PRECISION, price)?,
        };
        (remaining_in as u128, out, fee_on_remaining, false)
    };

    let protocol_fee = mul_div(fee_paid, protocol_fee_share as u128, BASIS_POINT_MAX)?;
    let lp_fee = fee_paid
        .checked_sub(protocol_fee)
        .ok_or(DualswapError::MathOverflow)?;

    Ok(BinSwapStep {
        amount_in_consumed: to_u64(gross_in)?,
        amount_out: to_u64(amount_out)?,
        protocol_fee: to_u64(protocol_fee)?,
        lp_fee: to_u64(lp_fee)?,
        exhausted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_price_at_bin_zero_is_unit() {
        assert_eq!(price_at_bin(0, 10).unwrap(), PRECISION);
    }

    #[test]
    fn test_price_at_bin_positive_ladder() {
        // bin_step 100 bps -> ratio 1.01
        let p1 = price_at_bin(1, 100).unwrap();
        assert_eq!(p1, PRECISION * 101 / 100);

        let p2 = price_at_bin(2, 100).unwrap();
        assert_eq!(p2, mul_div(p1, p1, PRECISION).unwrap());
    }

    #[test]
    fn test_price_at_bin_negative_is_reciprocal() {
        let up = price_at_bin(5, 100).unwrap();
        let down = price_at_bin(-5, 100).unwrap();
        let product = mul_div(up, down, PRECISION).unwrap();
        // Reciprocal within fixed-point rounding.
        assert!(product <= PRECISION);
        assert!(product >= PRECISION - 10);
    }

    #[test]
    fn test_price_at_bin_rejects_zero_step() {
        assert!(price_at_bin(5, 0).is_err());
    }

    #[test]
    fn test_bins_in_range() {
        assert_eq!(bins_in_range(-20, 20, 10).unwrap(), 4);
        assert_eq!(bins_in_range(0, 10, 10).unwrap(), 1);
        // empty range
        assert!(bins_in_range(10, 10, 10).is_err());
        // misaligned bounds
        assert!(bins_in_range(-15, 20, 10).is_err());
        // wider than the per-position cap
        assert!(bins_in_range(0, 710, 10).is_err());
    }

    #[test]
    fn test_amounts_for_bin_by_side() {
        let liq = 1_000_000u128;
        let price = 2 * PRECISION;

        // Above the active bin: pure A.
        assert_eq!(amounts_for_bin(30, 20, price, liq).unwrap(), (1_000_000, 0));
        // Below: pure B at the bin price.
        assert_eq!(amounts_for_bin(10, 20, price, liq).unwrap(), (0, 2_000_000));
        // Active bin is funded in full on both sides.
        assert_eq!(
            amounts_for_bin(20, 20, price, liq).unwrap(),
            (1_000_000, 2_000_000)
        );
    }

    #[test]
    fn test_active_bin_deposit_covers_drain() {
        // A deposit at the active bin must back the swap capacity the bin
        // quotes in each direction, so draining it pays out exactly the
        // deposited side and never more.
        let liq = 1_000_000u128;
        let price = price_at_bin(40, 20).unwrap();
        let (funded_a, funded_b) = amounts_for_bin(40, 40, price, liq).unwrap();

        let drain_b =
            compute_bin_swap(SwapDirection::AForB, liq, price, u64::MAX / 2, 25, 2_000).unwrap();
        assert!(drain_b.exhausted);
        assert_eq!(drain_b.amount_out, funded_b);

        let drain_a =
            compute_bin_swap(SwapDirection::BForA, liq, price, u64::MAX / 2, 25, 2_000).unwrap();
        assert!(drain_a.exhausted);
        assert_eq!(drain_a.amount_out, funded_a);
    }

    #[test]
    fn test_compute_bin_swap_partial_fill() {
        let liq = 10_000_000u128;
        let price = PRECISION; // bin 0
        let step = compute_bin_swap(SwapDirection::AForB, liq, price, 1_000_000, 25, 2_000)
            .unwrap();
        assert!(!step.exhausted);
        assert_eq!(step.amount_in_consumed, 1_000_000);
        // Fee 25 bps on input, output at unit price.
        let fee = 1_000_000 * 25 / 10_000;
        assert_eq!(step.amount_out, 1_000_000 - fee);
        assert_eq!(step.protocol_fee + step.lp_fee, fee);
        assert_eq!(step.protocol_fee, fee / 5);
    }

    #[test]
    fn test_compute_bin_swap_drains_bin() {
        let liq = 1_000_000u128;
        let price = PRECISION;
        let step = compute_bin_swap(SwapDirection::AForB, liq, price, 50_000_000, 25, 2_000)
            .unwrap();
        assert!(step.exhausted);
        assert_eq!(step.amount_out, 1_000_000);
        // Gross input is the drained capacity grossed up by the fee.
        assert_eq!(step.amount_in_consumed as u128, 1_000_000 * 10_000 / 9_975);
        assert!(step.amount_in_consumed > 1_000_000);
    }

    #[test]
    fn test_compute_bin_swap_empty_bin_is_free_cross() {
        let step =
            compute_bin_swap(SwapDirection::AForB, 0, PRECISION, 1_000, 25, 2_000).unwrap();
        assert!(step.exhausted);
        assert_eq!(step.amount_in_consumed, 0);
        assert_eq!(step.amount_out, 0);
    }

    #[test]
    fn test_accrued_bin_fees_saturates_below_snapshot() {
        // Growth below the snapshot yields zero instead of underflowing.
        assert_eq!(accrued_bin_fees(5, 10, 1_000_000).unwrap(), 0);
        assert_eq!(
            accrued_bin_fees(3 * PRECISION, PRECISION, 500).unwrap(),
            1_000
        );
    }

    #[test]
    fn test_fee_growth_delta_zero_liquidity() {
        assert_eq!(fee_growth_delta(100, 0).unwrap(), 0);
    }

    proptest! {
        /// A drained bin never pays out more than its capacity, and the fee
        /// never exceeds the configured rate on the gross input.
        #[test]
        fn prop_bin_swap_bounded(
            liquidity in 1u128..1_000_000_000_000,
            bin_id in -200i32..200,
            remaining_in in 1u64..1_000_000_000_000,
            fee_rate in 1u16..500,
        ) {
            let price = price_at_bin(bin_id, 20).unwrap();
            let step = compute_bin_swap(
                SwapDirection::AForB, liquidity, price, remaining_in, fee_rate, 2_000,
            ).unwrap();
            let capacity = bin_capacity_b(liquidity, price).unwrap();
            prop_assert!((step.amount_out as u128) <= capacity);
            prop_assert!(step.amount_in_consumed as u128 <= remaining_in as u128 + 1);
            let max_fee = (step.amount_in_consumed as u128) * (fee_rate as u128) / 10_000 + 1;
            prop_assert!((step.protocol_fee + step.lp_fee) as u128 <= max_fee);
        }

        /// The geometric ladder is monotonic in the bin id.
        #[test]
        fn prop_price_ladder_monotonic(bin_id in -500i32..500, bin_step in 1u16..100) {
            let p = price_at_bin(bin_id, bin_step).unwrap();
            let q = price_at_bin(bin_id + 1, bin_step).unwrap();
            prop_assert!(q > p);
        }
    }
}
