//! Swap simulation
//!
//! Replays the on-chain swap loop against a pool snapshot and the tick arrays
//! the caller has fetched, so a client can quote a trade and list the tick
//! array accounts the real instruction will need.

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::context::ClmmContext;
use crate::errors::{is_refetchable, ClmmError};
use crate::math::liquidity_math::{add_delta, apply_slippage_factor, slippage_factor, to_token_amount};
use crate::math::sqrt_price_math::{
    price_to_sqrt_price_x64, sqrt_price_x64_to_inverse_price, sqrt_price_x64_to_price,
};
use crate::math::swap_math::{calculate_fee_growth, compute_swap_step, split_fee};
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use crate::state::{
    get_first_initialized_tick_array, next_initialized_tick_array_start_index, PoolState, TickArrayState,
};
use ahash::AHashMap;
use anchor_lang::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

/// Decoded tick arrays of one pool, keyed by start tick index
pub type TickArrayCache = AHashMap<i32, TickArrayState>;

/// Final state of a simulated swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapComputeResult {
    /// Whether the specified amount was fully swapped before the price limit
    pub all_trade: bool,
    /// Part of the specified amount left unswapped
    pub amount_specified_remaining: u128,
    /// Output for exact input, input including fees for exact output
    pub amount_calculated: u128,
    pub sqrt_price_x64: u128,
    pub tick: i32,
    pub liquidity: u128,
    /// Trade fee charged on the input token
    pub fee_amount: u128,
    pub protocol_fee: u128,
    pub fund_fee: u128,
    /// Input side's fee growth global after the LP share of fees is credited
    pub fee_growth_global_x64: u128,
    /// Tick array accounts the swap walks, in order
    pub accounts: Vec<Pubkey>,
}

/// Quote for an exact-input swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeAmountOutResult {
    pub amount_out: u64,
    /// `amount_out` less slippage
    pub min_amount_out: u64,
    /// Pool price before the swap, output token per input token
    pub current_price: Decimal,
    /// Pool price after the swap, output token per input token
    pub execution_price: Decimal,
    pub price_impact_pct: Decimal,
    pub fee: u64,
    pub protocol_fee: u64,
    pub fund_fee: u64,
    pub remaining_accounts: Vec<Pubkey>,
    pub sqrt_price_x64_after: u128,
    pub tick_after: i32,
    /// Input actually swapped, less than requested if the price limit was hit
    pub amount_in_consumed: u64,
}

/// Quote for an exact-output swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeAmountInResult {
    /// Input required, fees included
    pub amount_in: u64,
    /// `amount_in` plus slippage
    pub max_amount_in: u64,
    pub current_price: Decimal,
    pub execution_price: Decimal,
    pub price_impact_pct: Decimal,
    pub fee: u64,
    pub protocol_fee: u64,
    pub fund_fee: u64,
    pub remaining_accounts: Vec<Pubkey>,
    pub sqrt_price_x64_after: u128,
    pub tick_after: i32,
    /// Output actually produced, less than requested if the price limit was hit
    pub amount_out_produced: u64,
}

/// Running state of the swap loop
#[derive(Debug)]
struct SwapState {
    amount_specified_remaining: u128,
    amount_calculated: u128,
    sqrt_price_x64: u128,
    tick: i32,
    liquidity: u128,
    fee_amount: u128,
    protocol_fee: u128,
    fund_fee: u128,
    fee_growth_global_x64: u128,
}

/// Simulate a swap of `amount_specified` against `pool`
///
/// # Arguments
/// * `zero_for_one` - true when token A is sold for token B (price decreasing)
/// * `is_base_input` - true for exact input, false for exact output
/// * `amount_specified` - input amount for exact input, output amount otherwise
/// * `sqrt_price_limit_x64` - price the swap must not cross; defaults to the
///   price bound in the swap direction
pub fn swap_compute(
    ctx: &ClmmContext,
    pool: &PoolState,
    tick_array_cache: &TickArrayCache,
    zero_for_one: bool,
    is_base_input: bool,
    amount_specified: u64,
    sqrt_price_limit_x64: Option<u128>,
) -> Result<SwapComputeResult> {
    ctx.in_scope(&pool.id, "swap_compute", || {
        simulate(
            pool,
            tick_array_cache,
            zero_for_one,
            is_base_input,
            amount_specified,
            sqrt_price_limit_x64,
        )
    })
}

/// Quote selling exactly `amount_in` of `input_mint`
///
/// `price_limit` is a price of token A in token B (decimals applied) the
/// swap stops at; `slippage` is a fraction in [0, 1].
pub fn compute_amount_out(
    ctx: &ClmmContext,
    pool: &PoolState,
    tick_array_cache: &TickArrayCache,
    input_mint: &Pubkey,
    amount_in: u64,
    slippage: Decimal,
    price_limit: Option<Decimal>,
) -> Result<ComputeAmountOutResult> {
    ctx.in_scope(&pool.id, "compute_amount_out", || {
        let zero_for_one = swap_direction(pool, input_mint, true)?;
        let slippage_factor = slippage_factor(slippage, false)?;
        let sqrt_price_limit_x64 = sqrt_price_limit(pool, price_limit)?;

        let result = simulate(pool, tick_array_cache, zero_for_one, true, amount_in, sqrt_price_limit_x64)?;

        let amount_out = to_token_amount(result.amount_calculated)?;
        let prices = QuotePrices::new(pool, result.sqrt_price_x64, zero_for_one)?;
        let amount_in_consumed = u128::from(amount_in) - result.amount_specified_remaining;

        debug!(
            amount_in,
            amount_out,
            fee = %result.fee_amount,
            accounts = result.accounts.len(),
            "computed amount out"
        );

        Ok(ComputeAmountOutResult {
            amount_out,
            min_amount_out: apply_slippage_factor(amount_out, slippage_factor)?,
            current_price: prices.current_price,
            execution_price: prices.execution_price,
            price_impact_pct: prices.price_impact_pct,
            fee: to_token_amount(result.fee_amount)?,
            protocol_fee: to_token_amount(result.protocol_fee)?,
            fund_fee: to_token_amount(result.fund_fee)?,
            remaining_accounts: result.accounts,
            sqrt_price_x64_after: result.sqrt_price_x64,
            tick_after: result.tick,
            amount_in_consumed: to_token_amount(amount_in_consumed)?,
        })
    })
}

/// Quote buying exactly `amount_out` of `output_mint`
pub fn compute_amount_in(
    ctx: &ClmmContext,
    pool: &PoolState,
    tick_array_cache: &TickArrayCache,
    output_mint: &Pubkey,
    amount_out: u64,
    slippage: Decimal,
    price_limit: Option<Decimal>,
) -> Result<ComputeAmountInResult> {
    ctx.in_scope(&pool.id, "compute_amount_in", || {
        let zero_for_one = swap_direction(pool, output_mint, false)?;
        let slippage_factor = slippage_factor(slippage, true)?;
        let sqrt_price_limit_x64 = sqrt_price_limit(pool, price_limit)?;

        let result = simulate(pool, tick_array_cache, zero_for_one, false, amount_out, sqrt_price_limit_x64)?;

        let amount_in = to_token_amount(result.amount_calculated)?;
        let prices = QuotePrices::new(pool, result.sqrt_price_x64, zero_for_one)?;
        let amount_out_produced = u128::from(amount_out) - result.amount_specified_remaining;

        debug!(
            amount_in,
            amount_out,
            fee = %result.fee_amount,
            accounts = result.accounts.len(),
            "computed amount in"
        );

        Ok(ComputeAmountInResult {
            amount_in,
            max_amount_in: apply_slippage_factor(amount_in, slippage_factor)?,
            current_price: prices.current_price,
            execution_price: prices.execution_price,
            price_impact_pct: prices.price_impact_pct,
            fee: to_token_amount(result.fee_amount)?,
            protocol_fee: to_token_amount(result.protocol_fee)?,
            fund_fee: to_token_amount(result.fund_fee)?,
            remaining_accounts: result.accounts,
            sqrt_price_x64_after: result.sqrt_price_x64,
            tick_after: result.tick,
            amount_out_produced: to_token_amount(amount_out_produced)?,
        })
    })
}

/// zero_for_one for a swap where `mint` is the input (`is_input`) or the output
fn swap_direction(pool: &PoolState, mint: &Pubkey, is_input: bool) -> Result<bool> {
    pool.mint_decimals(mint)?;
    let mint_is_a = *mint == pool.mint_a;
    Ok(mint_is_a == is_input)
}

fn sqrt_price_limit(pool: &PoolState, price_limit: Option<Decimal>) -> Result<Option<u128>> {
    price_limit
        .filter(|price| !price.is_zero())
        .map(|price| price_to_sqrt_price_x64(price, pool.mint_decimals_a, pool.mint_decimals_b))
        .transpose()
}

/// Before/after prices of a quote, oriented as output token per input token
struct QuotePrices {
    current_price: Decimal,
    execution_price: Decimal,
    price_impact_pct: Decimal,
}

impl QuotePrices {
    fn new(pool: &PoolState, sqrt_price_after_x64: u128, zero_for_one: bool) -> Result<Self> {
        let orient = |sqrt_price_x64: u128| -> Result<Decimal> {
            if zero_for_one {
                sqrt_price_x64_to_price(sqrt_price_x64, pool.mint_decimals_a, pool.mint_decimals_b)
            } else {
                sqrt_price_x64_to_inverse_price(sqrt_price_x64, pool.mint_decimals_a, pool.mint_decimals_b)
            }
        };
        let current_price = orient(pool.sqrt_price_x64)?;
        let execution_price = orient(sqrt_price_after_x64)?;
        let price_impact_pct = if current_price.is_zero() {
            Decimal::ZERO
        } else {
            (execution_price - current_price)
                .abs()
                .checked_div(current_price)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or(ClmmError::MathOverflow)?
        };
        Ok(Self {
            current_price,
            execution_price,
            price_impact_pct,
        })
    }
}

/// The swap loop shared by every entry point
fn simulate(
    pool: &PoolState,
    tick_array_cache: &TickArrayCache,
    zero_for_one: bool,
    is_base_input: bool,
    amount_specified: u64,
    sqrt_price_limit_x64: Option<u128>,
) -> Result<SwapComputeResult> {
    let result = swap_loop(
        pool,
        tick_array_cache,
        zero_for_one,
        is_base_input,
        amount_specified,
        sqrt_price_limit_x64,
    );
    if let Err(err) = &result {
        if is_refetchable(err) {
            warn!(
                tick_current = pool.tick_current,
                cached_tick_arrays = tick_array_cache.len(),
                error = %err,
                "tick arrays missing for quote"
            );
        }
    }
    result
}

fn swap_loop(
    pool: &PoolState,
    tick_array_cache: &TickArrayCache,
    zero_for_one: bool,
    is_base_input: bool,
    amount_specified: u64,
    sqrt_price_limit_x64: Option<u128>,
) -> Result<SwapComputeResult> {
    if amount_specified == 0 {
        return Err(Error::from(ClmmError::ZeroSwapAmount).with_account_name(pool.id.to_string()));
    }
    pool.validate()?;

    let sqrt_price_limit_x64 = match sqrt_price_limit_x64 {
        None if zero_for_one => MIN_SQRT_PRICE_X64 + 1,
        None => MAX_SQRT_PRICE_X64 - 1,
        Some(limit) => {
            let valid = if zero_for_one {
                limit < pool.sqrt_price_x64 && limit > MIN_SQRT_PRICE_X64
            } else {
                limit > pool.sqrt_price_x64 && limit < MAX_SQRT_PRICE_X64
            };
            if !valid {
                return Err(Error::from(ClmmError::InvalidPriceLimit)
                    .with_account_name(pool.id.to_string())
                    .with_values((limit.to_string(), pool.sqrt_price_x64.to_string())));
            }
            limit
        }
    };

    let tick_spacing = pool.tick_spacing();
    let bitmap = pool.tick_array_bitmap();

    let mut tick_array_start_index = get_first_initialized_tick_array(pool, zero_for_one)?;
    let mut tick_array = load_tick_array(pool, tick_array_cache, tick_array_start_index)?;
    let mut accounts = vec![tick_array.key(&pool.program_id)];

    let mut state = SwapState {
        amount_specified_remaining: u128::from(amount_specified),
        amount_calculated: 0,
        sqrt_price_x64: pool.sqrt_price_x64,
        tick: pool.tick_current,
        liquidity: pool.liquidity,
        fee_amount: 0,
        protocol_fee: 0,
        fund_fee: 0,
        fee_growth_global_x64: if zero_for_one {
            pool.fee_growth_global_a_x64
        } else {
            pool.fee_growth_global_b_x64
        },
    };

    while state.amount_specified_remaining != 0 && state.sqrt_price_x64 != sqrt_price_limit_x64 {
        let next_tick = match tick_array.next_initialized_tick(state.tick, tick_spacing, zero_for_one)? {
            Some(tick) => *tick,
            None => {
                let next_start = next_initialized_tick_array_start_index(
                    &bitmap,
                    tick_array_start_index,
                    tick_spacing,
                    zero_for_one,
                )
                .ok_or_else(|| {
                    Error::from(ClmmError::InsufficientLiquidity)
                        .with_account_name(pool.id.to_string())
                        .with_values(("tick", state.tick.to_string()))
                })?;
                trace!(from = tick_array_start_index, to = next_start, "advance tick array");

                tick_array_start_index = next_start;
                tick_array = load_tick_array(pool, tick_array_cache, next_start)?;
                accounts.push(tick_array.key(&pool.program_id));
                *tick_array.first_initialized_tick(zero_for_one)?
            }
        };

        let tick_next = next_tick.tick.clamp(MIN_TICK, MAX_TICK);
        let sqrt_price_next_x64 = get_sqrt_price_at_tick(tick_next)?;
        let sqrt_price_target_x64 = if zero_for_one {
            sqrt_price_next_x64.max(sqrt_price_limit_x64)
        } else {
            sqrt_price_next_x64.min(sqrt_price_limit_x64)
        };

        let sqrt_price_start_x64 = state.sqrt_price_x64;
        let step = compute_swap_step(
            state.sqrt_price_x64,
            sqrt_price_target_x64,
            state.liquidity,
            state.amount_specified_remaining,
            pool.amm_config.trade_fee_rate,
            is_base_input,
            zero_for_one,
        )?;
        state.sqrt_price_x64 = step.sqrt_price_next_x64;

        let amount_in_with_fee = step
            .amount_in
            .checked_add(step.fee_amount)
            .ok_or(ClmmError::MathOverflow)?;
        let (consumed, calculated) = if is_base_input {
            (amount_in_with_fee, step.amount_out)
        } else {
            (step.amount_out, amount_in_with_fee)
        };
        state.amount_specified_remaining = state
            .amount_specified_remaining
            .checked_sub(consumed)
            .ok_or(ClmmError::MathUnderflow)?;
        state.amount_calculated = state
            .amount_calculated
            .checked_add(calculated)
            .ok_or(ClmmError::MathOverflow)?;

        let fees = split_fee(step.fee_amount, &pool.amm_config)?;
        state.fee_amount = state.fee_amount.checked_add(step.fee_amount).ok_or(ClmmError::MathOverflow)?;
        state.protocol_fee = state.protocol_fee.checked_add(fees.protocol_fee).ok_or(ClmmError::MathOverflow)?;
        state.fund_fee = state.fund_fee.checked_add(fees.fund_fee).ok_or(ClmmError::MathOverflow)?;
        state.fee_growth_global_x64 = state
            .fee_growth_global_x64
            .wrapping_add(calculate_fee_growth(fees.lp_fee, state.liquidity)?);

        debug!(
            tick_next,
            sqrt_price_x64 = %state.sqrt_price_x64,
            amount_in = %step.amount_in,
            amount_out = %step.amount_out,
            fee = %step.fee_amount,
            "swap step"
        );

        if state.sqrt_price_x64 == sqrt_price_next_x64 {
            if next_tick.is_initialized() {
                let liquidity_net = if zero_for_one {
                    next_tick.liquidity_net.checked_neg().ok_or(ClmmError::LiquidityNetOverflow)?
                } else {
                    next_tick.liquidity_net
                };
                state.liquidity = add_delta(state.liquidity, liquidity_net)?;
                debug!(tick = tick_next, liquidity = %state.liquidity, "cross tick");
            }
            state.tick = if zero_for_one { tick_next - 1 } else { tick_next };
        } else if state.sqrt_price_x64 != sqrt_price_start_x64 {
            state.tick = get_tick_at_sqrt_price(state.sqrt_price_x64)?;
        }
    }

    Ok(SwapComputeResult {
        all_trade: state.amount_specified_remaining == 0,
        amount_specified_remaining: state.amount_specified_remaining,
        amount_calculated: state.amount_calculated,
        sqrt_price_x64: state.sqrt_price_x64,
        tick: state.tick,
        liquidity: state.liquidity,
        fee_amount: state.fee_amount,
        protocol_fee: state.protocol_fee,
        fund_fee: state.fund_fee,
        fee_growth_global_x64: state.fee_growth_global_x64,
        accounts,
    })
}

fn load_tick_array<'a>(
    pool: &PoolState,
    tick_array_cache: &'a TickArrayCache,
    start_tick_index: i32,
) -> Result<&'a TickArrayState> {
    tick_array_cache.get(&start_tick_index).ok_or_else(|| {
        Error::from(ClmmError::InsufficientLiquidity)
            .with_account_name(pool.id.to_string())
            .with_values(("tick_array_start_index", start_tick_index.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error_name;
    use crate::math::liquidity_math::get_amount_a_delta;
    use crate::state::{flip_tick_array_bit, AmmConfig};
    use crate::utils::get_pda_tick_array_address;
    use std::str::FromStr;

    const LIQUIDITY: u128 = 1_000_000_000;
    const SPACING: u16 = 60;
    const NO_REWARDS: [u128; 3] = [0; 3];

    /// Pool at `tick` with one position of LIQUIDITY over [lower, upper]
    fn fixture(tick: i32, lower: i32, upper: i32) -> (PoolState, TickArrayCache) {
        let mut pool = PoolState {
            program_id: Pubkey::new_unique(),
            id: Pubkey::new_unique(),
            mint_a: Pubkey::new_from_array([1; 32]),
            mint_b: Pubkey::new_from_array([2; 32]),
            mint_decimals_a: 6,
            mint_decimals_b: 6,
            amm_config: AmmConfig {
                trade_fee_rate: 2_500,
                protocol_fee_rate: 120_000,
                fund_fee_rate: 40_000,
                tick_spacing: SPACING,
            },
            sqrt_price_x64: get_sqrt_price_at_tick(tick).unwrap(),
            tick_current: tick,
            liquidity: if (lower..upper).contains(&tick) { LIQUIDITY } else { 0 },
            ..PoolState::default()
        };

        let mut cache = TickArrayCache::new();
        for (boundary, upper_boundary) in [(lower, false), (upper, true)] {
            let start = TickArrayState::get_array_start_index(boundary, SPACING);
            if !cache.contains_key(&start) {
                flip_tick_array_bit(&mut pool.tick_array_bitmap, start, SPACING).unwrap();
                cache.insert(start, TickArrayState::new(pool.id, start, SPACING).unwrap());
            }
            cache
                .get_mut(&start)
                .unwrap()
                .update_tick_state(boundary, SPACING, tick, LIQUIDITY as i128, 0, 0, &NO_REWARDS, upper_boundary)
                .unwrap();
        }
        (pool, cache)
    }

    fn address(pool: &PoolState, start: i32) -> Pubkey {
        get_pda_tick_array_address(&pool.program_id, &pool.id, start)
    }

    #[test]
    fn test_small_swap_within_one_array() {
        let (pool, cache) = fixture(30, 0, 60);
        let result = swap_compute(&ClmmContext::new(), &pool, &cache, true, true, 10_000, None).unwrap();

        assert!(result.all_trade);
        assert_eq!(result.accounts, vec![address(&pool, 0)]);
        assert!(result.fee_amount == 25 || result.fee_amount == 26);
        assert_eq!(result.liquidity, LIQUIDITY);
        // Input less fee moves the price exactly as far as the A delta says
        assert_eq!(
            10_000 - result.fee_amount,
            get_amount_a_delta(result.sqrt_price_x64, pool.sqrt_price_x64, LIQUIDITY, true).unwrap()
        );
        assert!(result.tick >= 0 && result.tick <= 30);
    }

    #[test]
    fn test_swap_reaches_next_array() {
        let (pool, cache) = fixture(0, -60, 60);
        let result = swap_compute(&ClmmContext::new(), &pool, &cache, true, true, 10_000, None).unwrap();

        // Tick 0 isn't initialized, so the lower boundary's array is loaded too
        assert_eq!(result.accounts, vec![address(&pool, 0), address(&pool, -3600)]);
        assert!(result.amount_calculated > 9_900 && result.amount_calculated < 9_975);
    }

    #[test]
    fn test_swap_crosses_out_of_liquidity() {
        let (pool, cache) = fixture(30, 0, 60);
        // Far more than the range holds: crosses tick 0 and runs out of arrays
        let err = swap_compute(&ClmmContext::new(), &pool, &cache, true, true, 1_000_000_000, None).unwrap_err();
        assert_eq!(error_name(&err), Some("InsufficientLiquidity"));
    }

    #[test]
    fn test_swap_stops_at_price_limit() {
        let (pool, cache) = fixture(30, 0, 60);
        let limit = get_sqrt_price_at_tick(10).unwrap();
        let result =
            swap_compute(&ClmmContext::new(), &pool, &cache, true, true, 1_000_000_000, Some(limit)).unwrap();

        assert!(!result.all_trade);
        assert_eq!(result.sqrt_price_x64, limit);
        assert_eq!(result.tick, 10);
        assert!(result.amount_specified_remaining > 0);
    }

    #[test]
    fn test_invalid_inputs() {
        let (pool, cache) = fixture(30, 0, 60);
        let ctx = ClmmContext::new();

        let err = swap_compute(&ctx, &pool, &cache, true, true, 0, None).unwrap_err();
        assert_eq!(error_name(&err), Some("ZeroSwapAmount"));

        // A zero_for_one limit above the current price
        let err =
            swap_compute(&ctx, &pool, &cache, true, true, 100, Some(get_sqrt_price_at_tick(40).unwrap())).unwrap_err();
        assert_eq!(error_name(&err), Some("InvalidPriceLimit"));

        let err = compute_amount_out(&ctx, &pool, &cache, &Pubkey::new_unique(), 100, Decimal::ZERO, None)
            .unwrap_err();
        assert_eq!(error_name(&err), Some("InvalidTokenMint"));

        let err = compute_amount_out(&ctx, &pool, &cache, &pool.mint_a, 100, Decimal::TWO, None).unwrap_err();
        assert_eq!(error_name(&err), Some("InvalidSlippage"));
    }

    #[test]
    fn test_missing_cached_array() {
        let (pool, mut cache) = fixture(0, -60, 60);
        cache.remove(&-3600);
        let err = swap_compute(&ClmmContext::new(), &pool, &cache, true, true, 10_000, None).unwrap_err();
        assert_eq!(error_name(&err), Some("InsufficientLiquidity"));
        assert!(is_refetchable(&err));
    }

    #[test]
    fn test_compute_amount_out_slippage_and_prices() {
        let (pool, cache) = fixture(30, 0, 60);
        let slippage = Decimal::from_str("0.01").unwrap();
        let quote =
            compute_amount_out(&ClmmContext::new(), &pool, &cache, &pool.mint_a, 10_000, slippage, None).unwrap();

        assert_eq!(quote.amount_in_consumed, 10_000);
        assert_eq!(quote.min_amount_out, quote.amount_out * 99 / 100);
        assert!(quote.protocol_fee + quote.fund_fee <= quote.fee);
        // Selling A pushes the B-per-A price down
        assert!(quote.execution_price < quote.current_price);
        assert!(quote.price_impact_pct > Decimal::ZERO);
        assert!(quote.price_impact_pct < Decimal::ONE);
    }

    #[test]
    fn test_compute_amount_in_round_trip() {
        let (pool, cache) = fixture(30, 0, 60);
        let ctx = ClmmContext::new();
        let quote_in = compute_amount_in(&ctx, &pool, &cache, &pool.mint_b, 5_000, Decimal::ZERO, None).unwrap();
        assert_eq!(quote_in.amount_out_produced, 5_000);
        assert_eq!(quote_in.max_amount_in, quote_in.amount_in);

        let quote_out =
            compute_amount_out(&ctx, &pool, &cache, &pool.mint_a, quote_in.amount_in, Decimal::ZERO, None).unwrap();
        assert!(quote_out.amount_out >= 4_998);
        assert!(quote_out.amount_out <= 5_002);
    }

    #[test]
    fn test_swap_one_for_zero_crosses_upper_tick() {
        let (pool, cache) = fixture(30, 0, 60);
        let limit = get_sqrt_price_at_tick(60).unwrap();
        let result =
            swap_compute(&ClmmContext::new(), &pool, &cache, false, true, 1_000_000_000, Some(limit)).unwrap();

        // Stops on the upper boundary having crossed it
        assert_eq!(result.liquidity, 0);
        assert_eq!(result.tick, 60);
        assert_eq!(result.sqrt_price_x64, limit);
        assert_eq!(result.accounts, vec![address(&pool, 0)]);
    }
}
