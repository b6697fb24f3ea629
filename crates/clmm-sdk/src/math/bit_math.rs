//! Bit Math
//!
//! Bit searches over the 1024-bit tick array bitmap.

use uint::construct_uint;

construct_uint! {
    /// 1024-bit unsigned integer, one bit per tick array
    pub struct U1024(16);
}

/// Number of bits in a U1024
pub const U1024_BITS: u32 = 1024;

/// Find the most significant bit (position of highest set bit)
/// Returns None for input 0
pub fn most_significant_bit(x: &U1024) -> Option<u16> {
    if x.is_zero() {
        return None;
    }
    Some((U1024_BITS - 1 - x.leading_zeros()) as u16)
}

/// Find the least significant bit (position of lowest set bit)
/// Returns None for input 0
pub fn least_significant_bit(x: &U1024) -> Option<u16> {
    if x.is_zero() {
        return None;
    }
    Some(x.trailing_zeros() as u16)
}

/// Mask with bits [low, high] set (inclusive)
pub fn range_mask(low: u16, high: u16) -> U1024 {
    if low > high || u32::from(low) >= U1024_BITS {
        return U1024::zero();
    }
    let high = high.min((U1024_BITS - 1) as u16);
    let upper = U1024::MAX >> (U1024_BITS as usize - 1 - usize::from(high));
    let lower = U1024::MAX << usize::from(low);
    upper & lower
}

/// Check if a specific bit is set
#[inline]
pub fn is_bit_set(bitmap: &U1024, position: u16) -> bool {
    u32::from(position) < U1024_BITS && bitmap.bit(usize::from(position))
}

/// Set a specific bit
#[inline]
pub fn set_bit(bitmap: U1024, position: u16) -> U1024 {
    if u32::from(position) >= U1024_BITS {
        return bitmap;
    }
    bitmap | (U1024::one() << usize::from(position))
}

/// Clear a specific bit
#[inline]
pub fn clear_bit(bitmap: U1024, position: u16) -> U1024 {
    if u32::from(position) >= U1024_BITS {
        return bitmap;
    }
    bitmap & !(U1024::one() << usize::from(position))
}
