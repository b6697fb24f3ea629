//! Full precision math operations
//!
//! 256-bit and 512-bit intermediates for the multiply-then-divide steps in
//! liquidity, fee and reward calculations. Every product goes through a
//! wide type so no step truncates before the division.

use crate::errors::ClmmError;
use anchor_lang::prelude::*;

// Kept away from the anchor prelude: its one-parameter `Result` alias breaks
// the `from_str_radix` the macro generates
mod wide {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer
        pub struct U256(4);
    }

    construct_uint! {
        /// 512-bit unsigned integer
        pub struct U512(8);
    }
}

pub use wide::{U256, U512};

pub use crate::constants::Q64;

/// Multiply two u128 numbers and divide by a third, rounding down
///
/// # Formula
/// result = floor(a * b / denominator)
///
/// # Errors
/// * `DivisionByZero` if `denominator` is zero
/// * `MulDivOverflow` if the quotient does not fit in u128
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(ClmmError::DivisionByZero.into());
    }
    let product = U256::from(a) * U256::from(b);
    u256_to_u128(product / U256::from(denominator))
}

/// Multiply two u128 numbers and divide by a third, rounding up
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(ClmmError::DivisionByZero.into());
    }
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let (quotient, remainder) = product.div_mod(denominator);
    let quotient = if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    };
    u256_to_u128(quotient)
}

/// floor or ceil of `a * b / denominator` over 256-bit operands
///
/// The product is carried in 512 bits, so only the quotient needs to fit.
pub fn mul_div_u256(a: U256, b: U256, denominator: U256, round_up: bool) -> Result<U256> {
    if denominator.is_zero() {
        return Err(ClmmError::DivisionByZero.into());
    }
    let product = widen(a) * widen(b);
    let (quotient, remainder) = product.div_mod(widen(denominator));
    let quotient = if round_up && !remainder.is_zero() {
        quotient + U512::one()
    } else {
        quotient
    };
    narrow(quotient).ok_or_else(|| ClmmError::MulDivOverflow.into())
}

/// Divide, rounding the quotient up
pub fn div_rounding_up(numerator: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(ClmmError::DivisionByZero.into());
    }
    let (quotient, remainder) = numerator.div_mod(denominator);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::one())
    }
}

/// Checked conversion of a 256-bit value into u128
pub fn u256_to_u128(value: U256) -> Result<u128> {
    if value.bits() > 128 {
        return Err(ClmmError::MulDivOverflow.into());
    }
    Ok(value.low_u128())
}

fn widen(value: U256) -> U512 {
    let mut words = [0u64; 8];
    words[..4].copy_from_slice(&value.0);
    U512(words)
}

fn narrow(value: U512) -> Option<U256> {
    if value.0[4..].iter().any(|word| *word != 0) {
        return None;
    }
    let mut words = [0u64; 4];
    words.copy_from_slice(&value.0[..4]);
    Some(U256(words))
}
