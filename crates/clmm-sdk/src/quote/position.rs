//! Owed fees, owed rewards and token amounts of a position

use crate::constants::REWARD_NUM;
use crate::errors::ClmmError;
use crate::math::liquidity_math::get_amounts_from_liquidity;
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::state::{PersonalPositionState, PoolState, RewardInfo, TickState};
use anchor_lang::prelude::*;

/// Fees a position can collect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionFees {
    pub token_fee_amount_a: u64,
    pub token_fee_amount_b: u64,
}

/// Tokens backing a position's liquidity at the pool's current price
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionAmounts {
    pub amount_a: u64,
    pub amount_b: u64,
}

/// Fees owed to `position`, from the pool's fee growth globals and the
/// position's boundary ticks
pub fn get_position_fees(
    pool: &PoolState,
    position: &PersonalPositionState,
    tick_lower: &TickState,
    tick_upper: &TickState,
) -> Result<PositionFees> {
    check_boundaries(position, tick_lower, tick_upper)?;
    let (fee_growth_inside_a_x64, fee_growth_inside_b_x64) = TickState::get_fee_growth_inside(
        tick_lower,
        tick_upper,
        pool.tick_current,
        pool.fee_growth_global_a_x64,
        pool.fee_growth_global_b_x64,
    );
    let (token_fee_amount_a, token_fee_amount_b) =
        position.pending_fees(fee_growth_inside_a_x64, fee_growth_inside_b_x64)?;
    Ok(PositionFees {
        token_fee_amount_a,
        token_fee_amount_b,
    })
}

/// Rewards owed to `position`, one entry per reward slot (zero for unused slots)
///
/// `reward_infos` should already be brought up to date with
/// `quote::reward::update_pool_reward_infos`.
pub fn get_position_rewards(
    pool: &PoolState,
    position: &PersonalPositionState,
    tick_lower: &TickState,
    tick_upper: &TickState,
    reward_infos: &[RewardInfo; REWARD_NUM],
) -> Result<Vec<u64>> {
    check_boundaries(position, tick_lower, tick_upper)?;
    let reward_growths_inside =
        TickState::get_reward_growths_inside(tick_lower, tick_upper, pool.tick_current, reward_infos);
    position.pending_rewards(&reward_growths_inside, reward_infos)
}

/// Token amounts of `position` at the pool's current price
///
/// Round up when sizing a deposit, down when quoting a withdrawal.
pub fn get_position_amounts(
    pool: &PoolState,
    position: &PersonalPositionState,
    round_up: bool,
) -> Result<PositionAmounts> {
    position.validate(pool.tick_spacing())?;
    let (amount_a, amount_b) = get_amounts_from_liquidity(
        pool.sqrt_price_x64,
        get_sqrt_price_at_tick(position.tick_lower_index)?,
        get_sqrt_price_at_tick(position.tick_upper_index)?,
        position.liquidity,
        round_up,
    )?;
    Ok(PositionAmounts { amount_a, amount_b })
}

fn check_boundaries(position: &PersonalPositionState, tick_lower: &TickState, tick_upper: &TickState) -> Result<()> {
    if tick_lower.tick != position.tick_lower_index || tick_upper.tick != position.tick_upper_index {
        return Err(Error::from(ClmmError::InvalidTickRange)
            .with_account_name(position.pool_id.to_string())
            .with_values((
                format!("{}..{}", tick_lower.tick, tick_upper.tick),
                format!("{}..{}", position.tick_lower_index, position.tick_upper_index),
            )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use crate::errors::error_name;
    use crate::state::AmmConfig;

    fn position(liquidity: u128) -> PersonalPositionState {
        PersonalPositionState {
            tick_lower_index: -60,
            tick_upper_index: 60,
            liquidity,
            ..PersonalPositionState::default()
        }
    }

    fn pool(tick: i32) -> PoolState {
        PoolState {
            amm_config: AmmConfig {
                tick_spacing: 60,
                ..AmmConfig::default()
            },
            sqrt_price_x64: get_sqrt_price_at_tick(tick).unwrap(),
            tick_current: tick,
            fee_growth_global_a_x64: 3 * Q64,
            fee_growth_global_b_x64: Q64,
            ..PoolState::default()
        }
    }

    #[test]
    fn test_fees_in_range() {
        let mut lower = TickState::new(-60);
        let upper = TickState::new(60);
        lower.fee_growth_outside_a_x64 = Q64;

        let fees = get_position_fees(&pool(0), &position(100), &lower, &upper).unwrap();
        assert_eq!(fees.token_fee_amount_a, 200);
        assert_eq!(fees.token_fee_amount_b, 100);
    }

    #[test]
    fn test_fees_out_of_range_only_count_time_inside() {
        let mut lower = TickState::new(-60);
        let mut upper = TickState::new(60);
        lower.fee_growth_outside_a_x64 = Q64;
        // Crossed upward at 2 * Q64: growth above the range started there
        upper.fee_growth_outside_a_x64 = 2 * Q64;

        let fees = get_position_fees(&pool(120), &position(100), &lower, &upper).unwrap();
        // inside = 3 - 1 - (3 - 2) = 1 unit per liquidity
        assert_eq!(fees.token_fee_amount_a, 100);
    }

    #[test]
    fn test_fees_never_negative_when_growth_appears_to_drop() {
        let mut pool = pool(0);
        pool.fee_growth_global_a_x64 = 10 * Q64;
        let mut pos = position(1_000_000);
        pos.fee_growth_inside_a_last_x64 = 10 * Q64 + 5;
        pos.token_fees_owed_a = 9;

        let fees = get_position_fees(&pool, &pos, &TickState::new(-60), &TickState::new(60)).unwrap();
        assert_eq!(fees.token_fee_amount_a, 9);
    }

    #[test]
    fn test_mismatched_boundaries() {
        let err = get_position_fees(&pool(0), &position(1), &TickState::new(-120), &TickState::new(60)).unwrap_err();
        assert_eq!(error_name(&err), Some("InvalidTickRange"));
    }

    #[test]
    fn test_rewards_use_growth_inside() {
        let mut reward_infos = [RewardInfo::default(); REWARD_NUM];
        reward_infos[1].token_mint = Pubkey::new_unique();
        reward_infos[1].reward_growth_global_x64 = 4 * Q64;

        let mut pos = position(10);
        pos.reward_infos[1].growth_inside_last_x64 = Q64;
        let rewards =
            get_position_rewards(&pool(0), &pos, &TickState::new(-60), &TickState::new(60), &reward_infos).unwrap();
        assert_eq!(rewards, vec![0, 30, 0]);
    }

    #[test]
    fn test_amounts_by_price_position() {
        let pos = position(1_000_000_000);

        let in_range = get_position_amounts(&pool(0), &pos, false).unwrap();
        assert!(in_range.amount_a > 0 && in_range.amount_b > 0);

        let below = get_position_amounts(&pool(-120), &pos, false).unwrap();
        assert!(below.amount_a > 0);
        assert_eq!(below.amount_b, 0);

        let above = get_position_amounts(&pool(120), &pos, true).unwrap();
        assert_eq!(above.amount_a, 0);
        assert!(above.amount_b > 0);
    }
}
