// CLMM protocol constants
// Values mirror the on-chain program so that off-chain quotes match bit for bit

/// Number of ticks stored in one tick array account
pub const TICK_ARRAY_SIZE: i32 = 60;

/// `TICK_ARRAY_SIZE` as a length for fixed-size arrays
pub const TICK_ARRAY_SIZE_USIZE: usize = 60;

/// Minimum tick index (p(i) = 1.0001^i)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
pub const MAX_TICK: i32 = -MIN_TICK;

/// Sqrt price at MIN_TICK (Q64.64 format)
pub const MIN_SQRT_PRICE_X64: u128 = 4295048016;

/// Sqrt price at MAX_TICK (Q64.64 format)
pub const MAX_SQRT_PRICE_X64: u128 = 79226673521066979257578248091;

/// Q64 multiplier (2^64)
pub const Q64: u128 = 1 << 64;

/// Fee rates are numerators over this denominator (1_000_000 = 100%)
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;

/// Half the number of bits in the default tick array bitmap.
/// Bit `i` of the bitmap stands for tick array `(i - 512) * tick_count`.
pub const TICK_ARRAY_BITMAP_SIZE: i32 = 512;

/// Number of 64-bit words in the pool's tick array bitmap
pub const TICK_ARRAY_BITMAP_WORDS: usize = 16;

/// Maximum number of reward emission schedules per pool
pub const REWARD_NUM: usize = 3;

/// Maximum tick spacing accepted by the pool config
pub const MAX_TICK_SPACING: u16 = 16384;

/// Slippage factors are applied with this many decimal digits of precision
pub const SLIPPAGE_PRECISION: u128 = 10_000_000_000;

/// Seconds in a (non leap) year, for APR annualisation
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Account seeds for PDA derivation
pub mod seeds {
    pub const TICK_ARRAY_SEED: &[u8] = b"tick_array";
}
