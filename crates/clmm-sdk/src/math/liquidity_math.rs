//! Liquidity Math
//!
//! Conversions between liquidity and token amounts over a sqrt price range.
//!
//! Rounding is always the caller's choice: amounts a user must deposit round
//! up, amounts a user receives round down. Both favour the pool.

use crate::constants::SLIPPAGE_PRECISION;
use crate::errors::ClmmError;
use crate::math::full_math::{
    div_rounding_up, mul_div_ceil, mul_div_floor, mul_div_u256, u256_to_u128, Q64, U256,
};
use anchor_lang::prelude::*;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

/// Add a signed liquidity delta to a liquidity value
/// Returns error on overflow or underflow
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128> {
    if delta >= 0 {
        liquidity
            .checked_add(delta.unsigned_abs())
            .ok_or_else(|| ClmmError::LiquidityNetOverflow.with_value("liquidity_delta", delta))
    } else {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or_else(|| ClmmError::InsufficientLiquidity.with_value("liquidity_delta", delta))
    }
}

fn sort(sqrt_price_a_x64: u128, sqrt_price_b_x64: u128) -> (u128, u128) {
    if sqrt_price_a_x64 > sqrt_price_b_x64 {
        (sqrt_price_b_x64, sqrt_price_a_x64)
    } else {
        (sqrt_price_a_x64, sqrt_price_b_x64)
    }
}

/// Amount of token A between two sqrt prices for a given liquidity
/// amount_a = L * (sqrt_upper - sqrt_lower) / (sqrt_upper * sqrt_lower)
///
/// The two prices may be passed in either order.
pub fn get_amount_a_delta(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = sort(sqrt_price_a_x64, sqrt_price_b_x64);
    if sqrt_price_lower == 0 {
        return Err(ClmmError::DivisionByZero.into());
    }

    let numerator_1 = U256::from(liquidity) << 64;
    let numerator_2 = U256::from(sqrt_price_upper - sqrt_price_lower);

    let amount = if round_up {
        div_rounding_up(
            mul_div_u256(numerator_1, numerator_2, U256::from(sqrt_price_upper), true)?,
            U256::from(sqrt_price_lower),
        )?
    } else {
        mul_div_u256(numerator_1, numerator_2, U256::from(sqrt_price_upper), false)?
            / U256::from(sqrt_price_lower)
    };

    u256_to_u128(amount)
}

/// Amount of token B between two sqrt prices for a given liquidity
/// amount_b = L * (sqrt_upper - sqrt_lower)
pub fn get_amount_b_delta(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = sort(sqrt_price_a_x64, sqrt_price_b_x64);
    let diff = sqrt_price_upper - sqrt_price_lower;
    if round_up {
        mul_div_ceil(liquidity, diff, Q64)
    } else {
        mul_div_floor(liquidity, diff, Q64)
    }
}

/// Liquidity provided by `amount_a` of token A over a price range
/// L = amount_a * sqrt_upper * sqrt_lower / (Q64 * (sqrt_upper - sqrt_lower))
pub fn get_liquidity_from_token_amount_a(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    amount_a: u64,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = sort(sqrt_price_a_x64, sqrt_price_b_x64);
    // sqrt_upper * sqrt_lower overflows u128, so scale one factor down first
    let intermediate = mul_div_floor(sqrt_price_lower, sqrt_price_upper, Q64)?;
    mul_div_floor(
        u128::from(amount_a),
        intermediate,
        sqrt_price_upper - sqrt_price_lower,
    )
}

/// Liquidity provided by `amount_b` of token B over a price range
/// L = amount_b * Q64 / (sqrt_upper - sqrt_lower)
pub fn get_liquidity_from_token_amount_b(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    amount_b: u64,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = sort(sqrt_price_a_x64, sqrt_price_b_x64);
    mul_div_floor(u128::from(amount_b), Q64, sqrt_price_upper - sqrt_price_lower)
}

/// Maximum liquidity that the given amounts can back
/// for a position in the range [sqrt_price_a, sqrt_price_b]
/// at the current sqrt_price
pub fn get_liquidity_from_token_amounts(
    sqrt_price_current_x64: u128,
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    amount_a: u64,
    amount_b: u64,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = sort(sqrt_price_a_x64, sqrt_price_b_x64);

    if sqrt_price_current_x64 <= sqrt_price_lower {
        // Current price is below range, only token A is needed
        get_liquidity_from_token_amount_a(sqrt_price_lower, sqrt_price_upper, amount_a)
    } else if sqrt_price_current_x64 < sqrt_price_upper {
        let liquidity_a =
            get_liquidity_from_token_amount_a(sqrt_price_current_x64, sqrt_price_upper, amount_a)?;
        let liquidity_b =
            get_liquidity_from_token_amount_b(sqrt_price_lower, sqrt_price_current_x64, amount_b)?;
        // The scarcer side determines how much can actually be deposited
        Ok(liquidity_a.min(liquidity_b))
    } else {
        // Current price is above range, only token B is needed
        get_liquidity_from_token_amount_b(sqrt_price_lower, sqrt_price_upper, amount_b)
    }
}

/// Token amounts represented by `liquidity` in the range [sqrt_price_a,
/// sqrt_price_b] at the current sqrt price
///
/// # Errors
/// * `CastOverflow` if either amount exceeds u64
pub fn get_amounts_from_liquidity(
    sqrt_price_current_x64: u128,
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u64, u64)> {
    let (sqrt_price_lower, sqrt_price_upper) = sort(sqrt_price_a_x64, sqrt_price_b_x64);

    let (amount_a, amount_b) = if sqrt_price_current_x64 <= sqrt_price_lower {
        // Below range: all token A
        (
            get_amount_a_delta(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?,
            0,
        )
    } else if sqrt_price_current_x64 < sqrt_price_upper {
        (
            get_amount_a_delta(sqrt_price_current_x64, sqrt_price_upper, liquidity, round_up)?,
            get_amount_b_delta(sqrt_price_lower, sqrt_price_current_x64, liquidity, round_up)?,
        )
    } else {
        // Above range: all token B
        (
            0,
            get_amount_b_delta(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?,
        )
    };

    Ok((to_token_amount(amount_a)?, to_token_amount(amount_b)?))
}

/// Token amounts for `liquidity` widened (`amount_max`) or narrowed by a
/// slippage fraction, for building deposit maxima or withdrawal minima
pub fn get_amounts_from_liquidity_with_slippage(
    sqrt_price_current_x64: u128,
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    amount_max: bool,
    round_up: bool,
    slippage: Decimal,
) -> Result<(u64, u64)> {
    let (amount_a, amount_b) = get_amounts_from_liquidity(
        sqrt_price_current_x64,
        sqrt_price_a_x64,
        sqrt_price_b_x64,
        liquidity,
        round_up,
    )?;
    let factor = slippage_factor(slippage, amount_max)?;
    Ok((
        apply_slippage_factor(amount_a, factor)?,
        apply_slippage_factor(amount_b, factor)?,
    ))
}

/// `1 ± slippage` as a fixed-point numerator over SLIPPAGE_PRECISION, floored
pub fn slippage_factor(slippage: Decimal, add: bool) -> Result<u128> {
    if slippage < Decimal::ZERO || slippage > Decimal::ONE {
        return Err(ClmmError::InvalidSlippage.with_value("slippage", slippage));
    }
    let factor = if add {
        Decimal::ONE + slippage
    } else {
        Decimal::ONE - slippage
    };
    let precision = Decimal::from(SLIPPAGE_PRECISION as u64);
    factor
        .checked_mul(precision)
        .and_then(|scaled| scaled.floor().to_u128())
        .ok_or_else(|| ClmmError::InvalidSlippage.with_value("slippage", slippage))
}

/// amount * factor / SLIPPAGE_PRECISION, rounded down
pub fn apply_slippage_factor(amount: u64, factor: u128) -> Result<u64> {
    to_token_amount(mul_div_floor(u128::from(amount), factor, SLIPPAGE_PRECISION)?)
}

pub(crate) fn to_token_amount(amount: u128) -> Result<u64> {
    u64::try_from(amount).map_err(|_| ClmmError::CastOverflow.with_value("amount", amount))
}
