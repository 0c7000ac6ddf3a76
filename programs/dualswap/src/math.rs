//! Full precision math operations
//!
//! 256-bit intermediate arithmetic for products of u128 values, plus an
//! integer square root for initial LP supply derivation.

use crate::errors::DualswapError;
use anchor_lang::prelude::*;

// The generated impls must see core::result::Result, not the prelude's
// single-argument alias, so the macro lives in its own module.
mod u256 {
    uint::construct_uint! {
        /// 256-bit unsigned integer (4 x 64-bit limbs)
        pub struct U256(4);
    }
}
pub use u256::U256;

/// Compute (a * b) / denominator with a 256-bit intermediate, rounding down.
///
/// Fails with MathOverflow if the denominator is zero or the quotient does
/// not fit in a u128.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return err!(DualswapError::MathOverflow);
    }
    let result = U256::from(a) * U256::from(b) / U256::from(denominator);
    if result > U256::from(u128::MAX) {
        return err!(DualswapError::MathOverflow);
    }
    Ok(result.as_u128())
}

/// Narrow a u128 to u64, failing with MathOverflow instead of truncating.
pub fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| DualswapError::MathOverflow.into())
}

/// Integer square root (Newton's method), rounding down.
pub fn integer_sqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }
    let mut x = value / 2;
    let mut y = (x + value / x) / 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_simple() {
        // 10 * 20 / 5 = 40
        assert_eq!(mul_div(10, 20, 5).unwrap(), 40);
    }

    #[test]
    fn test_mul_div_no_intermediate_overflow() {
        // (2^100 * 2^100) / 2^100 = 2^100 even though the product
        // exceeds u128
        let big = 1u128 << 100;
        assert_eq!(mul_div(big, big, big).unwrap(), big);
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert!(mul_div(10, 20, 0).is_err());
    }

    #[test]
    fn test_mul_div_result_overflow() {
        assert!(mul_div(u128::MAX, 2, 1).is_err());
    }

    #[test]
    fn test_integer_sqrt() {
        assert_eq!(integer_sqrt(0), 0);
        assert_eq!(integer_sqrt(1), 1);
        assert_eq!(integer_sqrt(99), 9);
        assert_eq!(integer_sqrt(100), 10);
        assert_eq!(integer_sqrt(10_000_000_000_000_000), 100_000_000);
    }

    #[test]
    fn test_to_u64_bounds() {
        assert_eq!(to_u64(u64::MAX as u128).unwrap(), u64::MAX);
        assert!(to_u64(u64::MAX as u128 + 1).is_err());
    }
}
