use crate::constants::{Q64, REWARD_NUM};
use crate::errors::ClmmError;
use crate::math::full_math::mul_div_floor;
use crate::math::tick_math::{check_tick_in_range, check_ticks_order, is_valid_tick};
use crate::state::pool::RewardInfo;
use anchor_lang::prelude::*;

/// Per-reward bookkeeping on a position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionRewardInfo {
    /// Reward growth inside the position's range at last update (Q64.64)
    pub growth_inside_last_x64: u128,

    /// Rewards accrued but not yet claimed
    pub reward_amount_owed: u64,
}

/// Liquidity position - represents an LP's concentrated liquidity in a pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersonalPositionState {
    /// The pool this position belongs to
    pub pool_id: Pubkey,

    /// Lower tick of the position range
    pub tick_lower_index: i32,

    /// Upper tick of the position range
    pub tick_upper_index: i32,

    /// Amount of liquidity in this position
    pub liquidity: u128,

    /// Fee growth inside the position's range at last update (token A)
    pub fee_growth_inside_a_last_x64: u128,

    /// Fee growth inside the position's range at last update (token B)
    pub fee_growth_inside_b_last_x64: u128,

    /// Uncollected fees owed to the position (token A)
    pub token_fees_owed_a: u64,

    /// Uncollected fees owed to the position (token B)
    pub token_fees_owed_b: u64,

    pub reward_infos: [PositionRewardInfo; REWARD_NUM],
}

impl PersonalPositionState {
    /// Check if position is empty (no liquidity and no owed tokens)
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0
            && self.token_fees_owed_a == 0
            && self.token_fees_owed_b == 0
            && self.reward_infos.iter().all(|info| info.reward_amount_owed == 0)
    }

    /// Check if position has liquidity
    pub fn has_liquidity(&self) -> bool {
        self.liquidity > 0
    }

    /// Check the range is ordered, in bounds and on the spacing grid
    pub fn validate(&self, tick_spacing: u16) -> Result<()> {
        check_tick_in_range(self.tick_lower_index)?;
        check_tick_in_range(self.tick_upper_index)?;
        check_ticks_order(self.tick_lower_index, self.tick_upper_index)?;
        for tick in [self.tick_lower_index, self.tick_upper_index] {
            if !is_valid_tick(tick, tick_spacing) {
                return Err(ClmmError::TickSpacingMismatch.with_value("tick", tick));
            }
        }
        Ok(())
    }

    /// Fees owed to the position given the current growth inside its range
    ///
    /// tokens = owed + liquidity * (growth_inside - growth_inside_last) / 2^64,
    /// the growth difference taken modulo 2^128. A difference too large to be
    /// owed as u64 is an apparent decrease and adds nothing.
    pub fn pending_fees(&self, fee_growth_inside_a_x64: u128, fee_growth_inside_b_x64: u128) -> Result<(u64, u64)> {
        let fee_a = self.growth_to_amount(fee_growth_inside_a_x64, self.fee_growth_inside_a_last_x64);
        let fee_b = self.growth_to_amount(fee_growth_inside_b_x64, self.fee_growth_inside_b_last_x64);

        Ok((
            self.token_fees_owed_a
                .checked_add(fee_a)
                .ok_or(ClmmError::MathOverflow)?,
            self.token_fees_owed_b
                .checked_add(fee_b)
                .ok_or(ClmmError::MathOverflow)?,
        ))
    }

    /// Rewards owed per initialized reward slot, given the current reward
    /// growth inside the position's range
    pub fn pending_rewards(
        &self,
        reward_growths_inside_x64: &[u128; REWARD_NUM],
        reward_infos: &[RewardInfo; REWARD_NUM],
    ) -> Result<Vec<u64>> {
        let mut rewards = Vec::with_capacity(REWARD_NUM);
        for ((position_reward, growth_inside), reward_info) in self
            .reward_infos
            .iter()
            .zip(reward_growths_inside_x64)
            .zip(reward_infos)
        {
            if !reward_info.initialized() {
                rewards.push(0);
                continue;
            }
            let accrued = self.growth_to_amount(*growth_inside, position_reward.growth_inside_last_x64);
            rewards.push(
                position_reward
                    .reward_amount_owed
                    .checked_add(accrued)
                    .ok_or(ClmmError::MathOverflow)?,
            );
        }
        Ok(rewards)
    }

    fn growth_to_amount(&self, growth_inside_x64: u128, growth_inside_last_x64: u128) -> u64 {
        let growth_delta = growth_inside_x64.wrapping_sub(growth_inside_last_x64);
        if growth_delta == 0 || self.liquidity == 0 {
            return 0;
        }
        // An apparent decrease wraps to a delta near 2^128; it accrues nothing
        mul_div_floor(growth_delta, self.liquidity, Q64)
            .ok()
            .and_then(|accrued| u64::try_from(accrued).ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(liquidity: u128) -> PersonalPositionState {
        PersonalPositionState {
            pool_id: Pubkey::new_unique(),
            tick_lower_index: -120,
            tick_upper_index: 120,
            liquidity,
            ..PersonalPositionState::default()
        }
    }

    #[test]
    fn test_validate() {
        assert!(position(1).validate(60).is_ok());
        assert!(position(1).validate(80).is_err());

        let mut inverted = position(1);
        std::mem::swap(&mut inverted.tick_lower_index, &mut inverted.tick_upper_index);
        assert!(inverted.validate(60).is_err());
    }

    #[test]
    fn test_pending_fees() {
        let mut pos = position(1_000);
        pos.token_fees_owed_a = 7;
        pos.fee_growth_inside_a_last_x64 = Q64;

        // Growth of 2.5 per unit of liquidity on A, 0 on B
        let (fee_a, fee_b) = pos.pending_fees(Q64 * 7 / 2, 0).unwrap();
        assert_eq!(fee_a, 7 + 2_500);
        assert_eq!(fee_b, 0);
    }

    #[test]
    fn test_pending_fees_across_wraparound() {
        let mut pos = position(1_000);
        pos.fee_growth_inside_b_last_x64 = u128::MAX - Q64 + 1;
        // Inside growth wrapped past zero: the delta is still one unit per liquidity
        let (_, fee_b) = pos.pending_fees(0, 0).unwrap();
        assert_eq!(fee_b, 1_000);
    }

    #[test]
    fn test_pending_fees_apparent_decrease_accrues_nothing() {
        let mut pos = position(1_000_000);
        pos.token_fees_owed_a = 42;
        pos.fee_growth_inside_a_last_x64 = 10 * Q64 + 5;
        pos.reward_infos[0].growth_inside_last_x64 = 3 * Q64 + 1;

        let (fee_a, fee_b) = pos.pending_fees(10 * Q64, 0).unwrap();
        assert_eq!(fee_a, 42);
        assert_eq!(fee_b, 0);

        let mut reward_infos = [RewardInfo::default(); REWARD_NUM];
        reward_infos[0].token_mint = Pubkey::new_unique();
        let rewards = pos.pending_rewards(&[3 * Q64, 0, 0], &reward_infos).unwrap();
        assert_eq!(rewards, vec![0, 0, 0]);

        // Same with liquidity large enough to overflow the product itself
        pos.liquidity = u128::MAX / 2;
        let (fee_a, _) = pos.pending_fees(10 * Q64, 0).unwrap();
        assert_eq!(fee_a, 42);
    }

    #[test]
    fn test_pending_rewards_skips_unused_slots() {
        let mut pos = position(2_000);
        pos.reward_infos[0].reward_amount_owed = 5;

        let mut reward_infos = [RewardInfo::default(); REWARD_NUM];
        reward_infos[0].token_mint = Pubkey::new_unique();

        let rewards = pos.pending_rewards(&[Q64, Q64, Q64], &reward_infos).unwrap();
        assert_eq!(rewards, vec![2_005, 0, 0]);
    }

    #[test]
    fn test_is_empty() {
        assert!(position(0).is_empty());
        assert!(!position(0).has_liquidity());
        assert!(position(1).has_liquidity());
        assert!(!position(1).is_empty());
        let mut owed = position(0);
        owed.reward_infos[2].reward_amount_owed = 1;
        assert!(!owed.is_empty());
    }
}
