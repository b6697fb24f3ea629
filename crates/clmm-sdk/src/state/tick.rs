use crate::constants::REWARD_NUM;
use crate::errors::ClmmError;
use crate::state::pool::RewardInfo;
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Tick data - stored within tick arrays
/// Each tick represents a price point where liquidity can change
/// Layout is `#[repr(C)]` with explicit padding so tick arrays can be viewed zero-copy
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Default, Debug, Copy, Pod, Zeroable, PartialEq, Eq)]
#[repr(C)]
pub struct TickState {
    /// Tick index, a multiple of the pool's tick spacing
    pub tick: i32,                                      // 4 bytes, offset 0

    /// Padding for 16-byte alignment of the u128 fields
    pub _padding: [u8; 12],                             // 12 bytes, offset 4

    /// Net liquidity change when crossing this tick upward
    /// When price moves up through tick: add liquidity_net
    /// When price moves down through tick: subtract liquidity_net
    pub liquidity_net: i128,                            // 16 bytes, offset 16

    /// Total liquidity referencing this tick, zero means uninitialized
    pub liquidity_gross: u128,                          // 16 bytes, offset 32

    /// Fee growth on the other side of this tick (token A)
    pub fee_growth_outside_a_x64: u128,                 // 16 bytes, offset 48

    /// Fee growth on the other side of this tick (token B)
    pub fee_growth_outside_b_x64: u128,                 // 16 bytes, offset 64

    /// Reward growth on the other side of this tick, per reward
    pub reward_growths_outside_x64: [u128; REWARD_NUM], // 48 bytes, offset 80
}
// Total: 128 bytes

const _: () = assert!(std::mem::size_of::<TickState>() == 128);

impl TickState {
    /// Size in bytes
    pub const LEN: usize = 128;

    /// Fresh, uninitialized tick at `tick`
    pub fn new(tick: i32) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    /// Check if initialized
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    /// Apply a position's liquidity change to this boundary
    ///
    /// Returns true when the tick flips between initialized and uninitialized.
    pub fn update(
        &mut self,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_a_x64: u128,
        fee_growth_global_b_x64: u128,
        reward_growths_global_x64: &[u128; REWARD_NUM],
        upper: bool,
    ) -> Result<bool> {
        let liquidity_gross_before = self.liquidity_gross;
        let liquidity_gross_after =
            crate::math::liquidity_math::add_delta(liquidity_gross_before, liquidity_delta)?;

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

        if liquidity_gross_before == 0 {
            // By convention, all growth before initialization happened below the tick
            if self.tick <= tick_current {
                self.fee_growth_outside_a_x64 = fee_growth_global_a_x64;
                self.fee_growth_outside_b_x64 = fee_growth_global_b_x64;
                self.reward_growths_outside_x64 = *reward_growths_global_x64;
            }
        }

        self.liquidity_gross = liquidity_gross_after;

        // Lower boundaries add liquidity when crossed upward, upper boundaries remove it
        self.liquidity_net = if upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or_else(|| ClmmError::LiquidityNetOverflow.with_value("tick", self.tick))?;

        Ok(flipped)
    }

    /// Cross a tick when price moves through it
    ///
    /// Flips the outside growth values and returns `liquidity_net`; the caller
    /// negates it when the price is moving down.
    pub fn cross(
        &mut self,
        fee_growth_global_a_x64: u128,
        fee_growth_global_b_x64: u128,
        reward_growths_global_x64: &[u128; REWARD_NUM],
    ) -> i128 {
        self.fee_growth_outside_a_x64 =
            fee_growth_global_a_x64.wrapping_sub(self.fee_growth_outside_a_x64);
        self.fee_growth_outside_b_x64 =
            fee_growth_global_b_x64.wrapping_sub(self.fee_growth_outside_b_x64);
        for (outside, global) in self
            .reward_growths_outside_x64
            .iter_mut()
            .zip(reward_growths_global_x64)
        {
            *outside = global.wrapping_sub(*outside);
        }
        self.liquidity_net
    }

    /// Clear tick when it's no longer referenced
    pub fn clear(&mut self) {
        *self = Self::new(self.tick);
    }

    /// Calculate fee growth inside a tick range
    ///
    /// Growth counters are modular: every subtraction wraps, so a global
    /// counter that has wrapped past an outside snapshot still yields the
    /// true growth accumulated inside the range.
    pub fn get_fee_growth_inside(
        tick_lower: &TickState,
        tick_upper: &TickState,
        tick_current: i32,
        fee_growth_global_a_x64: u128,
        fee_growth_global_b_x64: u128,
    ) -> (u128, u128) {
        // Fee growth below lower tick
        let (fee_growth_below_a, fee_growth_below_b) = if tick_current >= tick_lower.tick {
            (tick_lower.fee_growth_outside_a_x64, tick_lower.fee_growth_outside_b_x64)
        } else {
            (
                fee_growth_global_a_x64.wrapping_sub(tick_lower.fee_growth_outside_a_x64),
                fee_growth_global_b_x64.wrapping_sub(tick_lower.fee_growth_outside_b_x64),
            )
        };

        // Fee growth above upper tick
        let (fee_growth_above_a, fee_growth_above_b) = if tick_current < tick_upper.tick {
            (tick_upper.fee_growth_outside_a_x64, tick_upper.fee_growth_outside_b_x64)
        } else {
            (
                fee_growth_global_a_x64.wrapping_sub(tick_upper.fee_growth_outside_a_x64),
                fee_growth_global_b_x64.wrapping_sub(tick_upper.fee_growth_outside_b_x64),
            )
        };

        (
            fee_growth_global_a_x64
                .wrapping_sub(fee_growth_below_a)
                .wrapping_sub(fee_growth_above_a),
            fee_growth_global_b_x64
                .wrapping_sub(fee_growth_below_b)
                .wrapping_sub(fee_growth_above_b),
        )
    }

    /// Calculate reward growth inside a tick range, zero for unused reward slots
    pub fn get_reward_growths_inside(
        tick_lower: &TickState,
        tick_upper: &TickState,
        tick_current: i32,
        reward_infos: &[RewardInfo; REWARD_NUM],
    ) -> [u128; REWARD_NUM] {
        let mut reward_growths_inside = [0u128; REWARD_NUM];
        for (i, reward_info) in reward_infos.iter().enumerate() {
            if !reward_info.initialized() {
                continue;
            }
            let global = reward_info.reward_growth_global_x64;

            let below = if tick_current >= tick_lower.tick {
                tick_lower.reward_growths_outside_x64[i]
            } else {
                global.wrapping_sub(tick_lower.reward_growths_outside_x64[i])
            };
            let above = if tick_current < tick_upper.tick {
                tick_upper.reward_growths_outside_x64[i]
            } else {
                global.wrapping_sub(tick_upper.reward_growths_outside_x64[i])
            };

            reward_growths_inside[i] = global.wrapping_sub(below).wrapping_sub(above);
        }
        reward_growths_inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_REWARDS: [u128; REWARD_NUM] = [0; REWARD_NUM];

    #[test]
    fn test_update_flips_and_sets_net() {
        let mut lower = TickState::new(-60);
        let mut upper = TickState::new(60);

        assert!(lower.update(0, 1_000, 10, 20, &NO_REWARDS, false).unwrap());
        assert!(upper.update(0, 1_000, 10, 20, &NO_REWARDS, true).unwrap());
        assert_eq!(lower.liquidity_net, 1_000);
        assert_eq!(upper.liquidity_net, -1_000);

        // Lower tick is at or below current: it inherits the global growth
        assert_eq!(lower.fee_growth_outside_a_x64, 10);
        assert_eq!(upper.fee_growth_outside_a_x64, 0);

        // Adding more doesn't flip; removing everything does
        assert!(!lower.update(0, 500, 10, 20, &NO_REWARDS, false).unwrap());
        assert!(lower.update(0, -1_500, 10, 20, &NO_REWARDS, false).unwrap());
        assert!(!lower.is_initialized());
        assert!(lower.update(0, -1, 10, 20, &NO_REWARDS, false).is_err());
    }

    #[test]
    fn test_cross_flips_outside_growth() {
        let mut tick = TickState::new(60);
        tick.update(0, 1_000, 0, 0, &NO_REWARDS, false).unwrap();
        tick.fee_growth_outside_a_x64 = 30;

        let net = tick.cross(100, 50, &[7, 0, 0]);
        assert_eq!(net, 1_000);
        assert_eq!(tick.fee_growth_outside_a_x64, 70);
        assert_eq!(tick.fee_growth_outside_b_x64, 50);
        assert_eq!(tick.reward_growths_outside_x64[0], 7);

        tick.clear();
        assert_eq!(tick.tick, 60);
        assert!(!tick.is_initialized());
    }

    #[test]
    fn test_fee_growth_inside_positions() {
        let mut lower = TickState::new(-60);
        let mut upper = TickState::new(60);
        lower.fee_growth_outside_a_x64 = 100;
        upper.fee_growth_outside_a_x64 = 50;

        // In range: global - below - above
        let (inside_a, _) = TickState::get_fee_growth_inside(&lower, &upper, 0, 1_000, 0);
        assert_eq!(inside_a, 850);

        // Below range: lower's outside is measured from the top
        let (inside_a, _) = TickState::get_fee_growth_inside(&lower, &upper, -120, 1_000, 0);
        assert_eq!(inside_a, 1_000u128.wrapping_sub(900).wrapping_sub(50));
    }

    #[test]
    fn test_fee_growth_inside_wraps() {
        let mut lower = TickState::new(-60);
        let upper = TickState::new(60);
        // Global wrapped past zero since the lower snapshot was taken
        lower.fee_growth_outside_a_x64 = u128::MAX - 9;
        let (inside_a, _) = TickState::get_fee_growth_inside(&lower, &upper, 0, 5, 0);
        assert_eq!(inside_a, 15);
    }

    #[test]
    fn test_reward_growths_inside_skips_uninitialized() {
        let mut lower = TickState::new(-60);
        let upper = TickState::new(60);
        lower.reward_growths_outside_x64 = [10, 10, 10];

        let mut reward_infos = [RewardInfo::default(); REWARD_NUM];
        reward_infos[0].token_mint = Pubkey::new_unique();
        reward_infos[0].reward_growth_global_x64 = 110;
        reward_infos[2].reward_growth_global_x64 = 999;

        let inside = TickState::get_reward_growths_inside(&lower, &upper, 0, &reward_infos);
        assert_eq!(inside, [100, 0, 0]);
    }

    #[test]
    fn test_pod_cast() {
        let tick = TickState::new(-120);
        let bytes = bytemuck::bytes_of(&tick);
        assert_eq!(bytes.len(), TickState::LEN);
        assert_eq!(&bytes[..4], &(-120i32).to_le_bytes());
    }
}
