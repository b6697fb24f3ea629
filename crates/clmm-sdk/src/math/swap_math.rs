//! Swap Math
//!
//! A single step of the swap loop: how far the price moves toward a target
//! for the amount still to be swapped, and what that step costs in fees.

use crate::constants::FEE_RATE_DENOMINATOR;
use crate::errors::ClmmError;
use crate::math::full_math::{mul_div_ceil, mul_div_floor, Q64};
use crate::math::liquidity_math::{get_amount_a_delta, get_amount_b_delta};
use crate::math::sqrt_price_math::{get_next_sqrt_price_from_input, get_next_sqrt_price_from_output};
use crate::state::AmmConfig;
use anchor_lang::prelude::*;

/// Result of a single swap step computation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapStep {
    /// The new sqrt price after the swap step
    pub sqrt_price_next_x64: u128,
    /// Amount of input token consumed, excluding the fee
    pub amount_in: u128,
    /// Amount of output token produced
    pub amount_out: u128,
    /// Fee charged on the input token
    pub fee_amount: u128,
}

/// How a step's fee divides between the protocol, the fund and LPs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeSplit {
    pub protocol_fee: u128,
    pub fund_fee: u128,
    pub lp_fee: u128,
}

/// Compute the result of a single swap step
///
/// # Arguments
/// * `sqrt_price_current_x64` - Current sqrt price (Q64.64)
/// * `sqrt_price_target_x64` - Target sqrt price (next tick or price limit)
/// * `liquidity` - Active liquidity
/// * `amount_remaining` - Amount still to be swapped (input if `is_base_input`, else output)
/// * `fee_rate` - Trade fee rate over FEE_RATE_DENOMINATOR (2500 = 0.25%)
/// * `is_base_input` - true for exact input, false for exact output
/// * `zero_for_one` - true if swapping token A for B (price decreasing)
pub fn compute_swap_step(
    sqrt_price_current_x64: u128,
    sqrt_price_target_x64: u128,
    liquidity: u128,
    amount_remaining: u128,
    fee_rate: u32,
    is_base_input: bool,
    zero_for_one: bool,
) -> Result<SwapStep> {
    if fee_rate >= FEE_RATE_DENOMINATOR {
        return Err(ClmmError::InvalidFeeRate.with_value("fee_rate", fee_rate));
    }
    let fee_complement = u128::from(FEE_RATE_DENOMINATOR - fee_rate);
    let mut step = SwapStep::default();

    if is_base_input {
        let amount_remaining_less_fee =
            mul_div_floor(amount_remaining, fee_complement, u128::from(FEE_RATE_DENOMINATOR))?;

        // Input needed to reach the target; None when it can't be represented
        let amount_in_to_target =
            amount_in_between(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, zero_for_one)
                .ok();

        match amount_in_to_target {
            Some(amount_in) if amount_remaining_less_fee >= amount_in => {
                step.sqrt_price_next_x64 = sqrt_price_target_x64;
                step.amount_in = amount_in;
            }
            _ => {
                step.sqrt_price_next_x64 = get_next_sqrt_price_from_input(
                    sqrt_price_current_x64,
                    liquidity,
                    amount_remaining_less_fee,
                    zero_for_one,
                )?;
            }
        }
    } else {
        let amount_out_to_target =
            amount_out_between(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, zero_for_one)
                .ok();

        match amount_out_to_target {
            Some(amount_out) if amount_remaining >= amount_out => {
                step.sqrt_price_next_x64 = sqrt_price_target_x64;
                step.amount_out = amount_out;
            }
            _ => {
                step.sqrt_price_next_x64 = get_next_sqrt_price_from_output(
                    sqrt_price_current_x64,
                    liquidity,
                    amount_remaining,
                    zero_for_one,
                )?;
            }
        }
    }

    let reached_target = step.sqrt_price_next_x64 == sqrt_price_target_x64;

    // Recompute whichever side wasn't fixed above at the price actually reached
    if !(reached_target && is_base_input) {
        step.amount_in = amount_in_between(
            step.sqrt_price_next_x64,
            sqrt_price_current_x64,
            liquidity,
            zero_for_one,
        )?;
    }
    if !(reached_target && !is_base_input) {
        step.amount_out = amount_out_between(
            step.sqrt_price_next_x64,
            sqrt_price_current_x64,
            liquidity,
            zero_for_one,
        )?;
    }

    // Exact output never pays out more than requested
    if !is_base_input && step.amount_out > amount_remaining {
        step.amount_out = amount_remaining;
    }

    step.fee_amount = if is_base_input && !reached_target {
        // Target not reached: everything left over is fee
        amount_remaining
            .checked_sub(step.amount_in)
            .ok_or(ClmmError::MathUnderflow)?
    } else {
        mul_div_ceil(step.amount_in, u128::from(fee_rate), fee_complement)?
    };

    Ok(step)
}

/// Input owed for moving the price from `sqrt_price_current_x64` to
/// `sqrt_price_next_x64`, rounded up
fn amount_in_between(
    sqrt_price_next_x64: u128,
    sqrt_price_current_x64: u128,
    liquidity: u128,
    zero_for_one: bool,
) -> Result<u128> {
    if zero_for_one {
        get_amount_a_delta(sqrt_price_next_x64, sqrt_price_current_x64, liquidity, true)
    } else {
        get_amount_b_delta(sqrt_price_current_x64, sqrt_price_next_x64, liquidity, true)
    }
}

/// Output produced by the same move, rounded down
fn amount_out_between(
    sqrt_price_next_x64: u128,
    sqrt_price_current_x64: u128,
    liquidity: u128,
    zero_for_one: bool,
) -> Result<u128> {
    if zero_for_one {
        get_amount_b_delta(sqrt_price_next_x64, sqrt_price_current_x64, liquidity, false)
    } else {
        get_amount_a_delta(sqrt_price_current_x64, sqrt_price_next_x64, liquidity, false)
    }
}

/// Split a step fee into protocol, fund and LP shares
///
/// Protocol and fund shares are each taken from the full fee, rounded down;
/// LPs keep the rest. The trader pays the same total either way.
pub fn split_fee(fee_amount: u128, amm_config: &AmmConfig) -> Result<FeeSplit> {
    let denominator = u128::from(FEE_RATE_DENOMINATOR);
    let protocol_fee = mul_div_floor(fee_amount, u128::from(amm_config.protocol_fee_rate), denominator)?;
    let fund_fee = mul_div_floor(fee_amount, u128::from(amm_config.fund_fee_rate), denominator)?;
    let lp_fee = fee_amount
        .checked_sub(protocol_fee)
        .and_then(|rest| rest.checked_sub(fund_fee))
        .ok_or(ClmmError::MathUnderflow)?;
    Ok(FeeSplit {
        protocol_fee,
        fund_fee,
        lp_fee,
    })
}

/// Fee growth per unit of liquidity (Q64.64)
/// fee_growth = fee_amount * 2^64 / liquidity
pub fn calculate_fee_growth(fee_amount: u128, liquidity: u128) -> Result<u128> {
    if liquidity == 0 || fee_amount == 0 {
        return Ok(0);
    }
    mul_div_floor(fee_amount, Q64, liquidity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_sqrt_price_at_tick;

    const ONE_X64: u128 = 1u128 << 64;
    const LIQUIDITY: u128 = 1_000_000_000;

    #[test]
    fn test_exact_input_within_range() {
        let target = get_sqrt_price_at_tick(-60).unwrap();
        let step = compute_swap_step(ONE_X64, target, LIQUIDITY, 10_000, 2_500, true, true).unwrap();

        // Doesn't reach the tick; the whole amount is consumed
        assert!(step.sqrt_price_next_x64 > target && step.sqrt_price_next_x64 < ONE_X64);
        assert_eq!(step.amount_in + step.fee_amount, 10_000);
        assert!(step.fee_amount >= 25 && step.fee_amount <= 26);
        // Price impact is tiny at this liquidity, so output is close to input less fee
        assert!(step.amount_out < step.amount_in);
        assert!(step.amount_out >= step.amount_in - 2);
    }

    #[test]
    fn test_exact_input_reaches_target() {
        let target = get_sqrt_price_at_tick(-60).unwrap();
        let step = compute_swap_step(ONE_X64, target, LIQUIDITY, 1_000_000_000, 2_500, true, true).unwrap();

        assert_eq!(step.sqrt_price_next_x64, target);
        assert_eq!(
            step.amount_in,
            get_amount_a_delta(target, ONE_X64, LIQUIDITY, true).unwrap()
        );
        assert_eq!(
            step.fee_amount,
            mul_div_ceil(step.amount_in, 2_500, 997_500).unwrap()
        );
        assert!(step.amount_in + step.fee_amount < 1_000_000_000);
    }

    #[test]
    fn test_exact_output_within_range() {
        let target = get_sqrt_price_at_tick(60).unwrap();
        let step = compute_swap_step(ONE_X64, target, LIQUIDITY, 10_000, 2_500, false, false).unwrap();

        assert!(step.sqrt_price_next_x64 > ONE_X64 && step.sqrt_price_next_x64 < target);
        assert_eq!(step.amount_out, 10_000);
        // Input covers the output plus the fee on top
        assert!(step.amount_in >= 10_000);
        assert_eq!(step.fee_amount, mul_div_ceil(step.amount_in, 2_500, 997_500).unwrap());
    }

    #[test]
    fn test_exact_output_capped_at_target() {
        let target = get_sqrt_price_at_tick(60).unwrap();
        let step = compute_swap_step(ONE_X64, target, LIQUIDITY, u128::from(u64::MAX), 2_500, false, false).unwrap();

        assert_eq!(step.sqrt_price_next_x64, target);
        assert_eq!(
            step.amount_out,
            get_amount_a_delta(ONE_X64, target, LIQUIDITY, false).unwrap()
        );
    }

    #[test]
    fn test_zero_liquidity_jumps_to_target() {
        let target = get_sqrt_price_at_tick(-120).unwrap();
        let step = compute_swap_step(ONE_X64, target, 0, 10_000, 2_500, true, true).unwrap();
        assert_eq!(step.sqrt_price_next_x64, target);
        assert_eq!(step.amount_in, 0);
        assert_eq!(step.amount_out, 0);
        assert_eq!(step.fee_amount, 0);
    }

    #[test]
    fn test_invalid_fee_rate() {
        assert!(compute_swap_step(ONE_X64, ONE_X64 - 1, LIQUIDITY, 1, FEE_RATE_DENOMINATOR, true, true).is_err());
    }

    #[test]
    fn test_split_fee() {
        let config = AmmConfig {
            trade_fee_rate: 2_500,
            protocol_fee_rate: 120_000,
            fund_fee_rate: 40_000,
            tick_spacing: 60,
        };
        let split = split_fee(1_000, &config).unwrap();
        assert_eq!(split.protocol_fee, 120);
        assert_eq!(split.fund_fee, 40);
        assert_eq!(split.lp_fee, 840);
    }

    #[test]
    fn test_fee_growth() {
        assert_eq!(calculate_fee_growth(100, 0).unwrap(), 0);
        assert_eq!(calculate_fee_growth(100, 100).unwrap(), ONE_X64);
        assert_eq!(calculate_fee_growth(1, 2).unwrap(), ONE_X64 / 2);
    }
}
