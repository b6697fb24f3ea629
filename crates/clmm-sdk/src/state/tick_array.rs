use crate::constants::{MAX_TICK, MIN_TICK, REWARD_NUM, TICK_ARRAY_SIZE, TICK_ARRAY_SIZE_USIZE};
use crate::errors::ClmmError;
use crate::state::tick::TickState;
use crate::utils::get_pda_tick_array_address;
use anchor_lang::prelude::*;

// initialized_tick_count is a u8
const _: () = assert!(TICK_ARRAY_SIZE <= u8::MAX as i32, "TICK_ARRAY_SIZE exceeds initialized_tick_count capacity");

/// Tick Array - stores a contiguous range of tick data
/// PDA: ["tick_array", pool_id, start_tick_index.to_be_bytes()]
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickArrayState {
    /// The pool this tick array belongs to
    pub pool_id: Pubkey,

    /// Starting tick index for this array
    /// Must be divisible by (TICK_ARRAY_SIZE * tick_spacing)
    pub start_tick_index: i32,

    /// Ticks in ascending order, `tick_spacing` apart
    pub ticks: [TickState; TICK_ARRAY_SIZE_USIZE],

    /// Number of initialized ticks in `ticks`
    pub initialized_tick_count: u8,
}

impl Default for TickArrayState {
    fn default() -> Self {
        Self {
            pool_id: Pubkey::default(),
            start_tick_index: 0,
            ticks: [TickState::default(); TICK_ARRAY_SIZE_USIZE],
            initialized_tick_count: 0,
        }
    }
}

impl TickArrayState {
    /// Empty array for `pool_id` starting at `start_tick_index`, with every tick index filled in
    pub fn new(pool_id: Pubkey, start_tick_index: i32, tick_spacing: u16) -> Result<Self> {
        if !Self::check_is_valid_start_index(start_tick_index, tick_spacing) {
            return Err(ClmmError::InvalidTickArrayStartIndex.with_value("start_tick_index", start_tick_index));
        }
        let mut array = Self {
            pool_id,
            start_tick_index,
            ..Self::default()
        };
        for (i, tick) in array.ticks.iter_mut().enumerate() {
            tick.tick = start_tick_index + i as i32 * i32::from(tick_spacing);
        }
        Ok(array)
    }

    /// Tick-array account address under `program_id`
    pub fn key(&self, program_id: &Pubkey) -> Pubkey {
        get_pda_tick_array_address(program_id, &self.pool_id, self.start_tick_index)
    }

    /// Number of ticks covered by one array
    pub fn tick_count(tick_spacing: u16) -> i32 {
        TICK_ARRAY_SIZE * i32::from(tick_spacing)
    }

    /// Calculate the start index for a tick array containing a given tick
    /// Rounds toward negative infinity
    pub fn get_array_start_index(tick_index: i32, tick_spacing: u16) -> i32 {
        let ticks_in_array = Self::tick_count(tick_spacing);
        let mut start = tick_index / ticks_in_array;
        if tick_index < 0 && tick_index % ticks_in_array != 0 {
            start -= 1;
        }
        start * ticks_in_array
    }

    /// Whether `start_tick_index` is the start of some array and within tick bounds
    pub fn check_is_valid_start_index(start_tick_index: i32, tick_spacing: u16) -> bool {
        if tick_spacing == 0 {
            return false;
        }
        let ticks_in_array = Self::tick_count(tick_spacing);
        if start_tick_index % ticks_in_array != 0 {
            return false;
        }
        // The array holding MIN_TICK may start below it
        start_tick_index >= Self::get_array_start_index(MIN_TICK, tick_spacing) && start_tick_index <= MAX_TICK
    }

    /// Whether `tick_index` falls in this array's span
    pub fn contains(&self, tick_index: i32, tick_spacing: u16) -> bool {
        Self::get_array_start_index(tick_index, tick_spacing) == self.start_tick_index
    }

    /// Position of `tick_index` within this array
    ///
    /// `TickSpacingMismatch` if the tick is not a multiple of the spacing,
    /// `OffsetOverflow` if it lies outside the array.
    pub fn get_tick_offset_in_array(&self, tick_index: i32, tick_spacing: u16) -> Result<usize> {
        if tick_spacing == 0 || tick_index % i32::from(tick_spacing) != 0 {
            return Err(ClmmError::TickSpacingMismatch.with_value("tick_index", tick_index));
        }
        let offset = (tick_index - self.start_tick_index) / i32::from(tick_spacing);
        if !(0..TICK_ARRAY_SIZE).contains(&offset) {
            return Err(ClmmError::OffsetOverflow.with_value("tick_index", tick_index));
        }
        Ok(offset as usize)
    }

    /// Get the tick at a specific index
    pub fn get_tick_state(&self, tick_index: i32, tick_spacing: u16) -> Result<&TickState> {
        let offset = self.get_tick_offset_in_array(tick_index, tick_spacing)?;
        Ok(&self.ticks[offset])
    }

    /// Get mutable tick at a specific index
    pub fn get_tick_state_mut(&mut self, tick_index: i32, tick_spacing: u16) -> Result<&mut TickState> {
        let offset = self.get_tick_offset_in_array(tick_index, tick_spacing)?;
        Ok(&mut self.ticks[offset])
    }

    /// Apply a position's liquidity change to one of its boundary ticks
    /// and keep `initialized_tick_count` in step
    #[allow(clippy::too_many_arguments)]
    pub fn update_tick_state(
        &mut self,
        tick_index: i32,
        tick_spacing: u16,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_a_x64: u128,
        fee_growth_global_b_x64: u128,
        reward_growths_global_x64: &[u128; REWARD_NUM],
        upper: bool,
    ) -> Result<bool> {
        let tick = self.get_tick_state_mut(tick_index, tick_spacing)?;
        tick.tick = tick_index;
        let flipped = tick.update(
            tick_current,
            liquidity_delta,
            fee_growth_global_a_x64,
            fee_growth_global_b_x64,
            reward_growths_global_x64,
            upper,
        )?;

        let initialized = tick.is_initialized();
        if flipped && !initialized {
            tick.clear();
        }

        if flipped {
            self.initialized_tick_count = if initialized {
                self.initialized_tick_count.checked_add(1).ok_or(ClmmError::MathOverflow)?
            } else {
                self.initialized_tick_count.checked_sub(1).ok_or(ClmmError::MathUnderflow)?
            };
        }

        Ok(flipped)
    }

    /// Find the next initialized tick in this array in the swap direction
    ///
    /// If `current_tick` is inside the array the scan starts at its offset,
    /// inclusive when moving down and exclusive when moving up. An array lying
    /// entirely ahead of `current_tick` yields its first initialized tick; an
    /// array behind it yields None.
    pub fn next_initialized_tick(
        &self,
        current_tick: i32,
        tick_spacing: u16,
        zero_for_one: bool,
    ) -> Result<Option<&TickState>> {
        let current_start = Self::get_array_start_index(current_tick, tick_spacing);

        if current_start != self.start_tick_index {
            let ahead = if zero_for_one {
                self.start_tick_index < current_start
            } else {
                self.start_tick_index > current_start
            };
            return Ok(if ahead { self.find_first_initialized(zero_for_one) } else { None });
        }

        let offset = (current_tick - self.start_tick_index) / i32::from(tick_spacing);
        let found = if zero_for_one {
            self.ticks[..=offset as usize]
                .iter()
                .rev()
                .find(|tick| tick.is_initialized())
        } else {
            self.ticks[(offset + 1) as usize..]
                .iter()
                .find(|tick| tick.is_initialized())
        };
        Ok(found)
    }

    /// First initialized tick met when entering this array
    /// Top-most when moving down, bottom-most when moving up
    pub fn first_initialized_tick(&self, zero_for_one: bool) -> Result<&TickState> {
        self.find_first_initialized(zero_for_one)
            .ok_or_else(|| ClmmError::InvalidTickArray.with_value("start_tick_index", self.start_tick_index))
    }

    fn find_first_initialized(&self, zero_for_one: bool) -> Option<&TickState> {
        if zero_for_one {
            self.ticks.iter().rev().find(|tick| tick.is_initialized())
        } else {
            self.ticks.iter().find(|tick| tick.is_initialized())
        }
    }
}
