//! Tick <-> price conversions against a pool's mints and tick spacing

use crate::errors::ClmmError;
use crate::math::sqrt_price_math::{
    get_tick_with_price_and_tick_spacing, sqrt_price_x64_to_inverse_price, sqrt_price_x64_to_price,
};
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::state::PoolState;
use anchor_lang::prelude::*;
use rust_decimal::Decimal;

/// Price at a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPrice {
    pub tick: i32,
    pub price: Decimal,
    pub tick_sqrt_price_x64: u128,
}

/// Tick on the spacing grid nearest a requested price, with its exact price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceAndTick {
    pub tick: i32,
    pub price: Decimal,
}

/// Price of `tick` in `pool`
///
/// With `base_in` the price is token B per token A, otherwise A per B.
pub fn get_tick_price(pool: &PoolState, tick: i32, base_in: bool) -> Result<TickPrice> {
    let tick_sqrt_price_x64 = get_sqrt_price_at_tick(tick)?;
    let price = if base_in {
        sqrt_price_x64_to_price(tick_sqrt_price_x64, pool.mint_decimals_a, pool.mint_decimals_b)?
    } else {
        sqrt_price_x64_to_inverse_price(tick_sqrt_price_x64, pool.mint_decimals_a, pool.mint_decimals_b)?
    };
    Ok(TickPrice {
        tick,
        price,
        tick_sqrt_price_x64,
    })
}

/// Snap `price` onto the pool's tick grid
///
/// `price` is read in the same orientation `get_tick_price` reports for
/// `base_in`; the returned price is the exact price of the snapped tick in
/// that orientation.
pub fn get_price_and_tick(pool: &PoolState, price: Decimal, base_in: bool) -> Result<PriceAndTick> {
    if price <= Decimal::ZERO {
        return Err(ClmmError::InvalidPrice.with_value("price", price));
    }
    let price_a_in_b = orient(price, base_in)?;
    let tick = get_tick_with_price_and_tick_spacing(
        price_a_in_b,
        pool.tick_spacing(),
        pool.mint_decimals_a,
        pool.mint_decimals_b,
    )?;
    let tick_price = get_tick_price(pool, tick, base_in)?;
    Ok(PriceAndTick {
        tick,
        price: tick_price.price,
    })
}

fn orient(price: Decimal, base_in: bool) -> Result<Decimal> {
    if base_in {
        return Ok(price);
    }
    Decimal::ONE
        .checked_div(price)
        .ok_or_else(|| ClmmError::InvalidPrice.with_value("price", price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_TICK, MIN_TICK};
    use crate::state::AmmConfig;
    use std::str::FromStr;

    fn pool(decimals_a: u8, decimals_b: u8) -> PoolState {
        PoolState {
            mint_decimals_a: decimals_a,
            mint_decimals_b: decimals_b,
            amm_config: AmmConfig {
                tick_spacing: 10,
                ..AmmConfig::default()
            },
            ..PoolState::default()
        }
    }

    #[test]
    fn test_tick_price_orientation() {
        let pool = pool(6, 6);
        let at_zero = get_tick_price(&pool, 0, true).unwrap();
        assert_eq!(at_zero.price, Decimal::ONE);
        assert_eq!(at_zero.tick_sqrt_price_x64, 1u128 << 64);

        let base = get_tick_price(&pool, 1_000, true).unwrap();
        let quote = get_tick_price(&pool, 1_000, false).unwrap();
        // 1.0001^1000 ≈ 1.10517
        assert!((base.price - Decimal::from_str("1.10517").unwrap()).abs() < Decimal::from_str("0.0001").unwrap());
        assert!((base.price * quote.price - Decimal::ONE).abs() < Decimal::from_str("0.000000001").unwrap());
    }

    #[test]
    fn test_tick_price_decimals() {
        // 9-decimal A against 6-decimal B: raw price 1 reads as 1000
        let price = get_tick_price(&pool(9, 6), 0, true).unwrap().price;
        assert_eq!(price, Decimal::from(1_000));
    }

    #[test]
    fn test_inverse_price_at_extreme_tick() {
        // A in B is ~5e-29 here, below Decimal's precision
        let pool = pool(0, 9);
        let inverse = get_tick_price(&pool, MIN_TICK, false).unwrap();
        assert!(inverse.price > Decimal::from(10u64.pow(27)));

        let inverse = get_tick_price(&pool, MAX_TICK, false).unwrap();
        assert!(inverse.price > Decimal::ZERO);
    }

    #[test]
    fn test_price_and_tick_snaps_to_spacing() {
        let pool = pool(6, 6);
        let snapped = get_price_and_tick(&pool, Decimal::from_str("1.10517").unwrap(), true).unwrap();
        assert_eq!(snapped.tick % 10, 0);
        assert!((990..=1_010).contains(&snapped.tick));
        assert_eq!(snapped.price, get_tick_price(&pool, snapped.tick, true).unwrap().price);

        let inverse = get_price_and_tick(&pool, Decimal::from_str("0.904837").unwrap(), false).unwrap();
        assert!((990..=1_010).contains(&inverse.tick));
        assert_eq!(inverse.tick % 10, 0);

        assert!(get_price_and_tick(&pool, Decimal::ZERO, true).is_err());
    }
}
