//! Reward accrual between the pool's last update and a given chain time

use crate::constants::{Q64, REWARD_NUM};
use crate::errors::ClmmError;
use crate::math::full_math::mul_div_floor;
use crate::math::liquidity_math::to_token_amount;
use crate::state::RewardInfo;
use anchor_lang::prelude::*;
use tracing::trace;

/// Bring each reward's growth global and emitted total up to `chain_time`
///
/// Unused slots, rewards not yet open and pools without liquidity are
/// returned unchanged. Emission stops at `end_time`. Calling again with the
/// same `chain_time` accrues nothing more.
pub fn update_pool_reward_infos(
    chain_time: u64,
    pool_liquidity: u128,
    reward_infos: &[RewardInfo; REWARD_NUM],
) -> Result<[RewardInfo; REWARD_NUM]> {
    let mut updated = *reward_infos;

    for (index, reward_info) in updated.iter_mut().enumerate() {
        if !reward_info.initialized() || chain_time <= reward_info.open_time {
            continue;
        }

        let accrue_until = chain_time.min(reward_info.end_time);
        let elapsed = accrue_until.saturating_sub(reward_info.last_update_time);

        if pool_liquidity != 0 && elapsed != 0 {
            let growth_delta = mul_div_floor(
                u128::from(elapsed),
                reward_info.emissions_per_second_x64,
                pool_liquidity,
            )?;
            reward_info.reward_growth_global_x64 =
                reward_info.reward_growth_global_x64.wrapping_add(growth_delta);

            let emitted = to_token_amount(mul_div_floor(
                u128::from(elapsed),
                reward_info.emissions_per_second_x64,
                Q64,
            )?)?;
            reward_info.reward_total_emissioned = reward_info
                .reward_total_emissioned
                .checked_add(emitted)
                .ok_or_else(|| ClmmError::MathOverflow.with_value("reward_index", index))?;

            trace!(index, elapsed, growth_delta = %growth_delta, emitted, "reward accrued");
        }

        if pool_liquidity != 0 {
            reward_info.last_update_time = reward_info.last_update_time.max(accrue_until);
        }
    }

    Ok(updated)
}
