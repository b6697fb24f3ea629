//! Tick Math
//!
//! Converts between tick indices and sqrt prices.
//!
//! tick = log_{1.0001}(price) = log(price) / log(1.0001)
//! sqrt_price = sqrt(1.0001^tick) = 1.0001^(tick/2)
//!
//! The multipliers below are the Q64.64 values of sqrt(1.0001)^-(2^i) used
//! by the on-chain program, so the sqrt prices produced here are bit-identical
//! to what the program stores after a swap.

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::errors::ClmmError;
use crate::math::full_math::U256;
use anchor_lang::prelude::*;

/// (bit of |tick|, Q64.64 multiplier) for bits 1 and above
const TICK_RATIOS_X64: [(u32, u128); 18] = [
    (0x2, 0xfff97272373d4000),
    (0x4, 0xfff2e50f5f657000),
    (0x8, 0xffe5caca7e10f000),
    (0x10, 0xffcb9843d60f7000),
    (0x20, 0xff973b41fa98e800),
    (0x40, 0xff2ea16466c9b000),
    (0x80, 0xfe5dee046a9a3800),
    (0x100, 0xfcbe86c7900bb000),
    (0x200, 0xf987a7253ac65800),
    (0x400, 0xf3392b0822bb6000),
    (0x800, 0xe7159475a2caf000),
    (0x1000, 0xd097f3bdfd2f2000),
    (0x2000, 0xa9f746462d9f8000),
    (0x4000, 0x70d869a156f31c00),
    (0x8000, 0x31be135f97ed3200),
    (0x10000, 0x9aa508b5b85a500),
    (0x20000, 0x5d6af8dedc582c),
    (0x40000, 0x2216e584f5fa),
];

/// Get the sqrt price (Q64.64) at a given tick
///
/// # Errors
/// * `InvalidTick` if `tick` is outside [MIN_TICK, MAX_TICK]
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128> {
    check_tick_in_range(tick)?;
    let abs_tick = tick.unsigned_abs();

    // ratio = sqrt(1.0001)^-|tick| in Q64.64
    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(0xfffcb933bd6fb800u128)
    } else {
        U256::from(1u128 << 64)
    };
    for (bit, multiplier) in TICK_RATIOS_X64 {
        if abs_tick & bit != 0 {
            ratio = (ratio * U256::from(multiplier)) >> 64;
        }
    }

    // The multipliers compute 1/1.0001^(|tick|/2); positive ticks take the reciprocal
    if tick > 0 {
        ratio = U256::from(u128::MAX) / ratio;
    }

    Ok(ratio.low_u128())
}

/// Get the greatest tick whose sqrt price is at or below `sqrt_price_x64`
///
/// # Errors
/// * `SqrtPriceBelowMinimum` / `SqrtPriceAboveMaximum` when the price is
///   outside the range the tick domain can express
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Result<i32> {
    if sqrt_price_x64 < MIN_SQRT_PRICE_X64 {
        return Err(ClmmError::SqrtPriceBelowMinimum.with_value("sqrt_price_x64", sqrt_price_x64));
    }
    if sqrt_price_x64 > MAX_SQRT_PRICE_X64 {
        return Err(ClmmError::SqrtPriceAboveMaximum.with_value("sqrt_price_x64", sqrt_price_x64));
    }

    // Binary search for the first tick whose price is above the target
    let mut low = MIN_TICK;
    let mut high = MAX_TICK + 1;

    while low < high {
        let mid = low + (high - low) / 2;
        if get_sqrt_price_at_tick(mid)? <= sqrt_price_x64 {
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    // low is now the smallest tick with sqrt_price > target
    Ok(low - 1)
}

/// Fail with `InvalidTick` unless `tick` is inside [MIN_TICK, MAX_TICK]
pub fn check_tick_in_range(tick: i32) -> Result<()> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(ClmmError::InvalidTick.with_value("tick", tick));
    }
    Ok(())
}

/// Check if a tick is valid for the given tick spacing
pub fn is_valid_tick(tick: i32, tick_spacing: u16) -> bool {
    tick_spacing != 0
        && (MIN_TICK..=MAX_TICK).contains(&tick)
        && tick % i32::from(tick_spacing) == 0
}

/// Validate a position's boundaries
pub fn check_ticks_order(tick_lower: i32, tick_upper: i32) -> Result<()> {
    if tick_lower >= tick_upper {
        return Err(ClmmError::InvalidTickRange.with_value("tick_lower", tick_lower));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sqrt_price_at_tick_zero() {
        // At tick 0, price = 1, sqrt_price = 1 * 2^64
        assert_eq!(get_sqrt_price_at_tick(0).unwrap(), 1u128 << 64);
    }

    #[test]
    fn test_tick_bounds() {
        assert_eq!(get_sqrt_price_at_tick(MIN_TICK).unwrap(), MIN_SQRT_PRICE_X64);
        assert_eq!(get_sqrt_price_at_tick(MAX_TICK).unwrap(), MAX_SQRT_PRICE_X64);

        assert!(get_sqrt_price_at_tick(MIN_TICK - 1).is_err());
        assert!(get_sqrt_price_at_tick(MAX_TICK + 1).is_err());
    }

    #[test]
    fn test_tick_at_sqrt_price_bounds() {
        assert_eq!(get_tick_at_sqrt_price(MIN_SQRT_PRICE_X64).unwrap(), MIN_TICK);
        assert_eq!(get_tick_at_sqrt_price(MAX_SQRT_PRICE_X64).unwrap(), MAX_TICK);
        assert_eq!(get_tick_at_sqrt_price(MAX_SQRT_PRICE_X64 - 1).unwrap(), MAX_TICK - 1);
        assert!(get_tick_at_sqrt_price(MIN_SQRT_PRICE_X64 - 1).is_err());
        assert!(get_tick_at_sqrt_price(MAX_SQRT_PRICE_X64 + 1).is_err());
    }

    #[test]
    fn test_tick_at_price_between_ticks() {
        let q64 = 1u128 << 64;
        assert_eq!(get_tick_at_sqrt_price(q64).unwrap(), 0);
        assert_eq!(get_tick_at_sqrt_price(q64 - 1).unwrap(), -1);
        let p60 = get_sqrt_price_at_tick(60).unwrap();
        assert_eq!(get_tick_at_sqrt_price(p60 - 1).unwrap(), 59);
    }

    #[test]
    fn test_sqrt_prices_at_various_ticks() {
        let q64 = (1u128 << 64) as f64;

        // At tick 200: price = 1.0001^200, sqrt_price = 1.0001^100 ≈ 1.01005
        let ratio_200 = get_sqrt_price_at_tick(200).unwrap() as f64 / q64;
        assert!((ratio_200 - 1.0100496).abs() < 1e-6);

        let ratio_neg200 = get_sqrt_price_at_tick(-200).unwrap() as f64 / q64;
        assert!((ratio_neg200 - 0.9900503).abs() < 1e-6);
    }

    #[test]
    fn test_tick_spacing_validation() {
        assert!(is_valid_tick(60, 60));
        assert!(is_valid_tick(-60, 60));
        assert!(!is_valid_tick(61, 60));
        assert!(!is_valid_tick(0, 0));
        assert!(!is_valid_tick(MAX_TICK + 1, 1));
        assert!(check_ticks_order(-60, 60).is_ok());
        assert!(check_ticks_order(60, 60).is_err());
    }

    proptest! {
        #[test]
        fn prop_tick_round_trip(tick in MIN_TICK..=MAX_TICK) {
            let sqrt_price = get_sqrt_price_at_tick(tick).unwrap();
            prop_assert_eq!(get_tick_at_sqrt_price(sqrt_price).unwrap(), tick);
        }

        #[test]
        fn prop_sqrt_price_strictly_increasing(tick in MIN_TICK..MAX_TICK) {
            let lower = get_sqrt_price_at_tick(tick).unwrap();
            let upper = get_sqrt_price_at_tick(tick + 1).unwrap();
            prop_assert!(lower < upper);
        }
    }
}
