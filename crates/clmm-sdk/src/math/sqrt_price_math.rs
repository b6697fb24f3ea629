//! Sqrt Price Math
//!
//! Functions for computing the next sqrt price given token deltas, and the
//! conversions between Q64.64 sqrt prices and human readable decimal prices.
//!
//! Decimal prices are for display and user input only; nothing in the swap
//! path depends on them.

use crate::constants::{MAX_TICK, MIN_TICK};
use crate::errors::ClmmError;
use crate::math::full_math::{div_rounding_up, mul_div_u256, u256_to_u128, Q64, U256};
use crate::math::tick_math::get_tick_at_sqrt_price;
use anchor_lang::prelude::*;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};

/// Largest power of ten a `Decimal` can hold
const MAX_DECIMAL_EXPONENT: i32 = 28;

/// Get the next sqrt price after adding or removing `amount` of token A
/// When adding A (selling A, price goes down):
///   new_sqrt_price = L * sqrt_price / (L + amount * sqrt_price)
///
/// When removing A (buying A, price goes up):
///   new_sqrt_price = L * sqrt_price / (L - amount * sqrt_price)
///
/// Always rounds up so the price never moves further than the amount pays for.
pub fn get_next_sqrt_price_from_amount_a_rounding_up(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }

    let numerator = U256::from(liquidity) << 64;
    let product = U256::from(amount) * U256::from(sqrt_price_x64);

    let denominator = if add {
        numerator
            .checked_add(product)
            .ok_or(ClmmError::MathOverflow)?
    } else {
        if product >= numerator {
            return Err(ClmmError::InsufficientLiquidity.with_value("amount_a", amount));
        }
        numerator - product
    };

    let next = mul_div_u256(numerator, U256::from(sqrt_price_x64), denominator, true)?;
    u256_to_u128(next)
}

/// Get the next sqrt price after adding or removing `amount` of token B
/// When adding B (selling B, price goes up):
///   new_sqrt_price = sqrt_price + amount / L
///
/// When removing B (buying B, price goes down):
///   new_sqrt_price = sqrt_price - amount / L
///
/// Always rounds down.
pub fn get_next_sqrt_price_from_amount_b_rounding_down(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }
    if liquidity == 0 {
        return Err(ClmmError::DivisionByZero.into());
    }

    let amount_x64 = U256::from(amount) << 64;
    if add {
        let quotient = u256_to_u128(amount_x64 / U256::from(liquidity))?;
        sqrt_price_x64
            .checked_add(quotient)
            .ok_or_else(|| ClmmError::SqrtPriceAboveMaximum.with_value("amount_b", amount))
    } else {
        let quotient = u256_to_u128(div_rounding_up(amount_x64, U256::from(liquidity))?)?;
        if quotient >= sqrt_price_x64 {
            return Err(ClmmError::SqrtPriceBelowMinimum.with_value("amount_b", amount));
        }
        Ok(sqrt_price_x64 - quotient)
    }
}

/// Get the next sqrt price from input amount
/// Determines direction and calls appropriate function
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_in: u128,
    zero_for_one: bool,
) -> Result<u128> {
    if zero_for_one {
        // Adding token A, sqrt price decreases
        get_next_sqrt_price_from_amount_a_rounding_up(sqrt_price_x64, liquidity, amount_in, true)
    } else {
        // Adding token B, sqrt price increases
        get_next_sqrt_price_from_amount_b_rounding_down(sqrt_price_x64, liquidity, amount_in, true)
    }
}

/// Get the next sqrt price from output amount
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_out: u128,
    zero_for_one: bool,
) -> Result<u128> {
    if zero_for_one {
        // Removing token B, sqrt price decreases
        get_next_sqrt_price_from_amount_b_rounding_down(sqrt_price_x64, liquidity, amount_out, false)
    } else {
        // Removing token A, sqrt price increases
        get_next_sqrt_price_from_amount_a_rounding_up(sqrt_price_x64, liquidity, amount_out, false)
    }
}

/// 10^exp as a Decimal, for mint decimal adjustments
pub(crate) fn decimal_pow10(exp: i32) -> Result<Decimal> {
    if exp.abs() > MAX_DECIMAL_EXPONENT {
        return Err(ClmmError::MathOverflow.with_value("decimal_exponent", exp));
    }
    let magnitude = 10i128.pow(exp.unsigned_abs());
    if exp >= 0 {
        Ok(Decimal::from_i128_with_scale(magnitude, 0))
    } else {
        Ok(Decimal::from_i128_with_scale(1, exp.unsigned_abs()))
    }
}

/// Convert a Q64.64 value into a Decimal
pub fn x64_to_decimal(value_x64: u128) -> Result<Decimal> {
    let value = Decimal::from_u128(value_x64)
        .ok_or_else(|| ClmmError::CastOverflow.with_value("value_x64", value_x64))?;
    let q64 = Decimal::from_u128(Q64).ok_or(ClmmError::CastOverflow)?;
    value
        .checked_div(q64)
        .ok_or_else(|| ClmmError::MathOverflow.into())
}

/// Convert a Q64.64 sqrt price into a price of token A quoted in token B,
/// adjusted for the mints' decimals
///
/// Decimal keeps 28 fractional digits, so near MIN_TICK with a wide decimals
/// gap the result rounds toward zero. Use `sqrt_price_x64_to_inverse_price`
/// for the B-in-A price there.
pub fn sqrt_price_x64_to_price(
    sqrt_price_x64: u128,
    mint_decimals_a: u8,
    mint_decimals_b: u8,
) -> Result<Decimal> {
    let sqrt_price = x64_to_decimal(sqrt_price_x64)?;
    let scale = decimal_pow10(i32::from(mint_decimals_a) - i32::from(mint_decimals_b))?;
    sqrt_price
        .checked_mul(sqrt_price)
        .and_then(|price| price.checked_mul(scale))
        .ok_or_else(|| ClmmError::MathOverflow.with_value("sqrt_price_x64", sqrt_price_x64))
}

/// Price of token B quoted in token A, adjusted for the mints' decimals
///
/// The sqrt price is inverted before squaring, so the result stays exact
/// where the A-in-B price is too small for Decimal.
pub fn sqrt_price_x64_to_inverse_price(
    sqrt_price_x64: u128,
    mint_decimals_a: u8,
    mint_decimals_b: u8,
) -> Result<Decimal> {
    let inverse_sqrt_price = Decimal::ONE
        .checked_div(x64_to_decimal(sqrt_price_x64)?)
        .ok_or_else(|| ClmmError::DivisionByZero.with_value("sqrt_price_x64", sqrt_price_x64))?;
    let scale = decimal_pow10(i32::from(mint_decimals_b) - i32::from(mint_decimals_a))?;
    inverse_sqrt_price
        .checked_mul(inverse_sqrt_price)
        .and_then(|price| price.checked_mul(scale))
        .ok_or_else(|| ClmmError::MathOverflow.with_value("sqrt_price_x64", sqrt_price_x64))
}

/// Convert a decimal price of token A in token B into a Q64.64 sqrt price
///
/// # Errors
/// * `InvalidPrice` for zero or negative prices
/// * `SqrtError` if the decimal square root fails
pub fn price_to_sqrt_price_x64(
    price: Decimal,
    mint_decimals_a: u8,
    mint_decimals_b: u8,
) -> Result<u128> {
    if price <= Decimal::ZERO {
        return Err(ClmmError::InvalidPrice.with_value("price", price));
    }
    let scale = decimal_pow10(i32::from(mint_decimals_b) - i32::from(mint_decimals_a))?;
    let adjusted = price
        .checked_mul(scale)
        .ok_or_else(|| ClmmError::MathOverflow.with_value("price", price))?;
    let root = adjusted.sqrt().ok_or(ClmmError::SqrtError)?;
    let q64 = Decimal::from_u128(Q64).ok_or(ClmmError::CastOverflow)?;
    root.checked_mul(q64)
        .ok_or_else(|| ClmmError::InvalidPrice.with_value("price", price))?
        .floor()
        .to_u128()
        .ok_or_else(|| ClmmError::CastOverflow.with_value("price", price))
}

/// Tick for a decimal price, snapped onto the tick spacing grid
///
/// The raw tick is found by binary search on the sqrt price. Negative ticks
/// snap down and non-negative ticks snap up, then the result is pulled back
/// inside [MIN_TICK, MAX_TICK].
pub fn get_tick_with_price_and_tick_spacing(
    price: Decimal,
    tick_spacing: u16,
    mint_decimals_a: u8,
    mint_decimals_b: u8,
) -> Result<i32> {
    if tick_spacing == 0 {
        return Err(ClmmError::InvalidTickSpacing.into());
    }
    let sqrt_price_x64 = price_to_sqrt_price_x64(price, mint_decimals_a, mint_decimals_b)?;
    let tick = get_tick_at_sqrt_price(sqrt_price_x64)?;
    let spacing = i32::from(tick_spacing);

    let mut snapped = if tick < 0 {
        tick.div_euclid(spacing) * spacing
    } else {
        (tick + spacing - 1) / spacing * spacing
    };
    if snapped > MAX_TICK {
        snapped -= spacing;
    } else if snapped < MIN_TICK {
        snapped += spacing;
    }
    Ok(snapped)
}
