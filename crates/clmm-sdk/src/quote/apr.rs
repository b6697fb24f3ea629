//! APR estimates for a user price range
//!
//! Both estimators take pool-wide statistics over a past window and scale
//! them to a narrower (or wider) position range. Neither touches pool state.

use crate::constants::{REWARD_NUM, SECONDS_PER_YEAR};
use crate::errors::ClmmError;
use crate::math::liquidity_math::get_amounts_from_liquidity;
use crate::math::sqrt_price_math::{decimal_pow10, x64_to_decimal};
use crate::math::tick_math::{check_ticks_order, get_sqrt_price_at_tick};
use crate::quote::price::get_tick_price;
use crate::state::PoolState;
use anchor_lang::prelude::*;
use rust_decimal::Decimal;

/// Pool statistics over a past window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolAprStats {
    /// Length of the window
    pub window_days: u32,
    /// LP fees earned by the whole pool during the window, in quote currency
    pub fee_volume: Decimal,
    /// Pool-wide fee APR over the window, in percent
    pub fee_apr: Decimal,
    /// Pool-wide APR of each reward slot, in percent
    pub reward_aprs: Vec<Decimal>,
    /// Lowest B-per-A price traded during the window
    pub price_min: Decimal,
    /// Highest B-per-A price traded during the window
    pub price_max: Decimal,
}

/// Market price and decimals of a reward mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardMintPrice {
    pub price: Decimal,
    pub decimals: u8,
}

/// Inputs to the liquidity-share estimator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AprDeltaInput {
    pub stats: PoolAprStats,
    /// Quote-currency price of one whole token A
    pub mint_price_a: Decimal,
    /// Quote-currency price of one whole token B
    pub mint_price_b: Decimal,
    /// One entry per pool reward slot; None when the price is unknown
    pub reward_mint_prices: Vec<Option<RewardMintPrice>>,
    /// Liquidity the user would add over the range
    pub liquidity: u128,
    pub chain_time: u64,
}

/// Estimated APRs for a range, in percent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AprEstimate {
    pub fee_apr: Decimal,
    pub reward_aprs: Vec<Decimal>,
    pub apr: Decimal,
}

impl AprEstimate {
    fn new(fee_apr: Decimal, reward_aprs: Vec<Decimal>) -> Result<Self> {
        let apr = reward_aprs
            .iter()
            .try_fold(fee_apr, |total, reward_apr| total.checked_add(*reward_apr))
            .ok_or(ClmmError::MathOverflow)?;
        Ok(Self {
            fee_apr,
            reward_aprs,
            apr,
        })
    }
}

/// Scale the pool's APRs by how the range overlaps the window's trading range
///
/// A range nested inside the traded range, or wrapping it, earns
/// `traded / range` times the pool APR. Partial overlaps earn
/// `(overlap / traded) * (overlap / range)`. No overlap earns nothing.
pub fn estimate_aprs_for_price_range_multiplier(
    pool: &PoolState,
    stats: &PoolAprStats,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<AprEstimate> {
    check_ticks_order(tick_lower, tick_upper)?;
    check_reward_len(stats.reward_aprs.len())?;

    let price_lower = get_tick_price(pool, tick_lower, true)?.price;
    let price_upper = get_tick_price(pool, tick_upper, true)?.price;

    let overlap_min = price_lower.max(stats.price_min);
    let overlap_max = price_upper.min(stats.price_max);
    let overlap = overlap_max - overlap_min;
    let user_range = price_upper - price_lower;
    let trade_range = stats.price_max - stats.price_min;

    let multiplier = if overlap <= Decimal::ZERO || user_range <= Decimal::ZERO {
        Decimal::ZERO
    } else if overlap == user_range {
        checked_div(trade_range, overlap)?
    } else if overlap == trade_range {
        checked_div(overlap, user_range)?
    } else {
        checked_mul(checked_div(overlap, trade_range)?, checked_div(overlap, user_range)?)?
    };

    let reward_aprs = stats
        .reward_aprs
        .iter()
        .map(|apr| checked_mul(*apr, multiplier))
        .collect::<Result<Vec<_>>>()?;
    AprEstimate::new(checked_mul(stats.fee_apr, multiplier)?, reward_aprs)
}

/// Estimate APRs from the share of liquidity value the user would hold
///
/// The pool's liquidity is valued over the user's range at the current
/// price; the user's share is their value over the combined value. Fees
/// annualise the window's fee volume; rewards annualise each active
/// emission rate at its mint price.
pub fn estimate_aprs_for_price_range_delta(
    pool: &PoolState,
    input: &AprDeltaInput,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<AprEstimate> {
    check_ticks_order(tick_lower, tick_upper)?;
    if input.reward_mint_prices.len() != REWARD_NUM {
        return Err(ClmmError::InvalidRewardInput.with_value("reward_mint_prices", input.reward_mint_prices.len()));
    }

    let sqrt_price_lower_x64 = get_sqrt_price_at_tick(tick_lower)?;
    let sqrt_price_upper_x64 = get_sqrt_price_at_tick(tick_upper)?;
    let value_of = |liquidity: u128| -> Result<Decimal> {
        let (amount_a, amount_b) = get_amounts_from_liquidity(
            pool.sqrt_price_x64,
            sqrt_price_lower_x64,
            sqrt_price_upper_x64,
            liquidity,
            false,
        )?;
        let value_a = token_value(amount_a, pool.mint_decimals_a, input.mint_price_a)?;
        let value_b = token_value(amount_b, pool.mint_decimals_b, input.mint_price_b)?;
        value_a.checked_add(value_b).ok_or_else(|| ClmmError::MathOverflow.into())
    };

    let user_value = value_of(input.liquidity)?;
    let total_value = value_of(pool.liquidity)?
        .checked_add(user_value)
        .ok_or(ClmmError::MathOverflow)?;
    if user_value.is_zero() || input.stats.window_days == 0 {
        return AprEstimate::new(Decimal::ZERO, vec![Decimal::ZERO; REWARD_NUM]);
    }
    // user_value / total_value is the share; dividing again by user_value gives APR per unit value
    let per_value = checked_div(Decimal::ONE, total_value)?;
    let hundred_per_value = checked_mul(per_value, Decimal::ONE_HUNDRED)?;

    let fees_per_year = checked_div(
        checked_mul(input.stats.fee_volume, Decimal::from(365))?,
        Decimal::from(input.stats.window_days),
    )?;
    let fee_apr = checked_mul(fees_per_year, hundred_per_value)?;

    let mut reward_aprs = Vec::with_capacity(REWARD_NUM);
    for (reward_info, mint_price) in pool.reward_infos.iter().zip(&input.reward_mint_prices) {
        let Some(mint_price) = mint_price else {
            reward_aprs.push(Decimal::ZERO);
            continue;
        };
        if !reward_info.is_active(input.chain_time) {
            reward_aprs.push(Decimal::ZERO);
            continue;
        }
        let per_second = x64_to_decimal(reward_info.emissions_per_second_x64)?;
        let per_year = checked_div(
            checked_mul(per_second, Decimal::from(SECONDS_PER_YEAR))?,
            decimal_pow10(i32::from(mint_price.decimals))?,
        )?;
        reward_aprs.push(checked_mul(checked_mul(per_year, mint_price.price)?, hundred_per_value)?);
    }

    AprEstimate::new(fee_apr, reward_aprs)
}

fn check_reward_len(len: usize) -> Result<()> {
    if len > REWARD_NUM {
        return Err(ClmmError::InvalidRewardInput.with_value("reward_aprs", len));
    }
    Ok(())
}

fn token_value(amount: u64, decimals: u8, price: Decimal) -> Result<Decimal> {
    let whole = checked_div(Decimal::from(amount), decimal_pow10(i32::from(decimals))?)?;
    checked_mul(whole, price)
}

fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(|| ClmmError::MathOverflow.into())
}

fn checked_div(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_div(b).ok_or_else(|| ClmmError::DivisionByZero.into())
}
