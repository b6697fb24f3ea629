//! Tick Array Bitmap
//!
//! The pool keeps one bit per tick array in sixteen u64 words. Bit `i` of the
//! merged 1024-bit value is set when the array starting at
//! `(i - 512) * tick_spacing * TICK_ARRAY_SIZE` holds at least one
//! initialized tick. Arrays beyond that window are not indexed here.

use crate::constants::{MAX_TICK, MIN_TICK, TICK_ARRAY_BITMAP_SIZE, TICK_ARRAY_BITMAP_WORDS};
use crate::errors::ClmmError;
use crate::math::bit_math::{
    clear_bit, is_bit_set, least_significant_bit, most_significant_bit, range_mask, set_bit, U1024,
    U1024_BITS,
};
use crate::state::pool::PoolState;
use crate::state::tick_array::TickArrayState;
use anchor_lang::prelude::*;

const MAX_BIT: i32 = U1024_BITS as i32 - 1;

/// Merge the pool's bitmap words into one value, word `i` holding bits [64i, 64i + 64)
pub fn merge_tick_array_bitmap(words: &[u64; TICK_ARRAY_BITMAP_WORDS]) -> U1024 {
    U1024(*words)
}

/// Largest |tick| the default bitmap can index for this spacing
pub fn max_tick_in_tick_array_bitmap(tick_spacing: u16) -> i32 {
    TickArrayState::tick_count(tick_spacing) * TICK_ARRAY_BITMAP_SIZE
}

/// Range of array start indexes covered by the default bitmap, `[min, max)`
/// trimmed to what the tick bounds can reach
pub fn tick_array_start_index_range(tick_spacing: u16) -> (i32, i32) {
    let mut max_boundary = max_tick_in_tick_array_bitmap(tick_spacing);
    let mut min_boundary = -max_boundary;
    if max_boundary > MAX_TICK {
        max_boundary =
            TickArrayState::get_array_start_index(MAX_TICK, tick_spacing) + TickArrayState::tick_count(tick_spacing);
    }
    if min_boundary < MIN_TICK {
        min_boundary = TickArrayState::get_array_start_index(MIN_TICK, tick_spacing);
    }
    (min_boundary, max_boundary)
}

/// Whether any of the given ticks lives in an array the default bitmap can't index
pub fn is_overflow_default_tick_array_bitmap(tick_spacing: u16, tick_indexes: &[i32]) -> bool {
    let (min_boundary, max_boundary) = tick_array_start_index_range(tick_spacing);
    tick_indexes.iter().any(|&tick_index| {
        let start = TickArrayState::get_array_start_index(tick_index, tick_spacing);
        start >= max_boundary || start < min_boundary
    })
}

/// Unchecked bit position for the array holding `tick_index`; may fall outside [0, 1024)
fn compressed_position(tick_index: i32, tick_spacing: u16) -> i32 {
    TickArrayState::get_array_start_index(tick_index, tick_spacing) / TickArrayState::tick_count(tick_spacing)
        + TICK_ARRAY_BITMAP_SIZE
}

/// Array start index for a bit position
fn start_index_for_position(position: i32, tick_spacing: u16) -> i32 {
    (position - TICK_ARRAY_BITMAP_SIZE) * TickArrayState::tick_count(tick_spacing)
}

/// Bitmap position of the array holding `tick_index`
pub fn tick_array_bit_position(tick_index: i32, tick_spacing: u16) -> Result<u16> {
    let position = compressed_position(tick_index, tick_spacing);
    if !(0..=MAX_BIT).contains(&position) {
        return Err(ClmmError::TickArrayOutOfBitmapRange.with_value("tick_index", tick_index));
    }
    Ok(position as u16)
}

/// Whether the array holding `tick_index` is initialized, with that array's start index
pub fn check_tick_array_is_initialized(bitmap: &U1024, tick_index: i32, tick_spacing: u16) -> Result<(bool, i32)> {
    let position = tick_array_bit_position(tick_index, tick_spacing)?;
    Ok((
        is_bit_set(bitmap, position),
        TickArrayState::get_array_start_index(tick_index, tick_spacing),
    ))
}

/// Set or clear the bit for the array starting at `start_tick_index`
pub fn flip_tick_array_bit(
    words: &mut [u64; TICK_ARRAY_BITMAP_WORDS],
    start_tick_index: i32,
    tick_spacing: u16,
) -> Result<()> {
    if !TickArrayState::check_is_valid_start_index(start_tick_index, tick_spacing) {
        return Err(ClmmError::InvalidTickArrayStartIndex.with_value("start_tick_index", start_tick_index));
    }
    let position = tick_array_bit_position(start_tick_index, tick_spacing)?;
    let bitmap = merge_tick_array_bitmap(words);
    let flipped = if is_bit_set(&bitmap, position) {
        clear_bit(bitmap, position)
    } else {
        set_bit(bitmap, position)
    };
    *words = flipped.0;
    Ok(())
}

/// Start indexes of up to `count` initialized arrays, scanning bit positions
/// downward from `start` to `end` (both inclusive)
pub fn search_low_bit_from_start(
    bitmap: &U1024,
    start: i32,
    end: i32,
    count: usize,
    tick_spacing: u16,
) -> Vec<i32> {
    let (high, low) = (start.min(MAX_BIT), end.max(0));
    if high < low {
        return Vec::new();
    }
    let mut remaining = *bitmap & range_mask(low as u16, high as u16);
    let mut found = Vec::with_capacity(count);
    while found.len() < count {
        let Some(position) = most_significant_bit(&remaining) else {
            break;
        };
        found.push(start_index_for_position(i32::from(position), tick_spacing));
        remaining = clear_bit(remaining, position);
    }
    found
}

/// Start indexes of up to `count` initialized arrays, scanning bit positions
/// upward from `start` to `end` (both inclusive)
pub fn search_high_bit_from_start(
    bitmap: &U1024,
    start: i32,
    end: i32,
    count: usize,
    tick_spacing: u16,
) -> Vec<i32> {
    let (low, high) = (start.max(0), end.min(MAX_BIT));
    if high < low {
        return Vec::new();
    }
    let mut remaining = *bitmap & range_mask(low as u16, high as u16);
    let mut found = Vec::with_capacity(count);
    while found.len() < count {
        let Some(position) = least_significant_bit(&remaining) else {
            break;
        };
        found.push(start_index_for_position(i32::from(position), tick_spacing));
        remaining = clear_bit(remaining, position);
    }
    found
}

/// Next initialized array strictly beyond `last_tick_array_start_index` in the swap direction
pub fn next_initialized_tick_array_start_index(
    bitmap: &U1024,
    last_tick_array_start_index: i32,
    tick_spacing: u16,
    zero_for_one: bool,
) -> Option<i32> {
    let position = compressed_position(last_tick_array_start_index, tick_spacing);
    let found = if zero_for_one {
        search_low_bit_from_start(bitmap, position - 1, 0, 1, tick_spacing)
    } else {
        search_high_bit_from_start(bitmap, position + 1, MAX_BIT, 1, tick_spacing)
    };
    found.first().copied()
}

/// Start index of the first tick array a swap from the pool's current tick will use
///
/// That is the array holding `tick_current` when it is initialized, otherwise
/// the nearest initialized array in the swap direction.
pub fn get_first_initialized_tick_array(pool: &PoolState, zero_for_one: bool) -> Result<i32> {
    let tick_spacing = pool.tick_spacing();
    let bitmap = pool.tick_array_bitmap();
    let (is_initialized, start_index) =
        check_tick_array_is_initialized(&bitmap, pool.tick_current, tick_spacing)
            .map_err(|e| e.with_account_name(pool.id.to_string()))?;
    if is_initialized {
        return Ok(start_index);
    }

    next_initialized_tick_array_start_index(&bitmap, start_index, tick_spacing, zero_for_one).ok_or_else(|| {
        Error::from(ClmmError::NoInitializedTickArray)
            .with_account_name(pool.id.to_string())
            .with_values(("tick_current", pool.tick_current.to_string()))
    })
}

/// Initialized arrays around `tick_array_start_index`: up to `count` below it
/// (nearest first), then up to `count` at or above it (nearest first)
pub fn get_initialized_tick_array_in_range(
    bitmap: &U1024,
    tick_spacing: u16,
    tick_array_start_index: i32,
    count: usize,
) -> Vec<i32> {
    let position = compressed_position(tick_array_start_index, tick_spacing);
    let mut found = search_low_bit_from_start(bitmap, position - 1, 0, count, tick_spacing);
    found.extend(search_high_bit_from_start(bitmap, position, MAX_BIT, count, tick_spacing));
    found
}
