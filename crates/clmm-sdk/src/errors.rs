use anchor_lang::prelude::*;

/// CLMM SDK Error Codes
/// Numbered from 6000 in declaration order, the `#[error_code]` default
#[error_code]
pub enum ClmmError {
    // ═══════════════════════════════════════════════════════════════════════
    // MATH ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Arithmetic overflow in checked operation
    #[msg("Math overflow")]
    MathOverflow, // 6000

    /// Arithmetic underflow in checked operation
    #[msg("Math underflow")]
    MathUnderflow, // 6001

    /// Division by zero attempted
    #[msg("Division by zero")]
    DivisionByZero, // 6002

    /// Result doesn't fit in expected type
    #[msg("Cast overflow")]
    CastOverflow, // 6003

    /// Decimal square root failed
    #[msg("Sqrt calculation error")]
    SqrtError, // 6004

    /// Quotient of a wide multiply-divide does not fit
    #[msg("Multiplication overflow in fixed-point math")]
    MulDivOverflow, // 6005

    // ═══════════════════════════════════════════════════════════════════════
    // TICK ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Tick outside [MIN_TICK, MAX_TICK] or not a multiple of the spacing
    #[msg("Invalid tick index")]
    InvalidTick, // 6006

    /// Tick is not aligned to the pool's tick spacing
    #[msg("Tick not aligned to spacing")]
    TickSpacingMismatch, // 6007

    /// Tick offset falls outside its tick array
    #[msg("Tick offset outside tick array")]
    OffsetOverflow, // 6008

    /// Lower tick must be less than upper tick
    #[msg("Lower tick must be less than upper tick")]
    InvalidTickRange, // 6009

    // ═══════════════════════════════════════════════════════════════════════
    // TICK ARRAY / BITMAP ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Start index is not a multiple of spacing * TICK_ARRAY_SIZE
    #[msg("Invalid tick array start index")]
    InvalidTickArrayStartIndex, // 6010

    /// Tick array lies outside the default 1024-bit bitmap
    #[msg("Tick array outside default bitmap range")]
    TickArrayOutOfBitmapRange, // 6011

    /// Tick array flagged in the bitmap holds no initialized tick
    #[msg("Invalid tick array")]
    InvalidTickArray, // 6012

    /// No initialized tick array in the swap direction
    #[msg("No initialized tick array")]
    NoInitializedTickArray, // 6013

    // ═══════════════════════════════════════════════════════════════════════
    // PRICE/LIQUIDITY ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Sqrt price is below minimum
    #[msg("Sqrt price below minimum")]
    SqrtPriceBelowMinimum, // 6014

    /// Sqrt price is above maximum
    #[msg("Sqrt price above maximum")]
    SqrtPriceAboveMaximum, // 6015

    /// Price is zero, negative or not representable
    #[msg("Invalid price")]
    InvalidPrice, // 6016

    /// Supplied tick arrays cannot fill the requested amount
    #[msg("Insufficient liquidity")]
    InsufficientLiquidity, // 6017

    /// Liquidity net overflow
    #[msg("Liquidity net overflow")]
    LiquidityNetOverflow, // 6018

    // ═══════════════════════════════════════════════════════════════════════
    // SWAP ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Swap amount is zero
    #[msg("Zero swap amount")]
    ZeroSwapAmount, // 6019

    /// Price limit on the wrong side of the current price
    #[msg("Invalid price limit")]
    InvalidPriceLimit, // 6020

    /// Slippage must be within [0, 1]
    #[msg("Invalid slippage")]
    InvalidSlippage, // 6021

    /// Mint is neither of the pool's mints
    #[msg("Invalid token mint")]
    InvalidTokenMint, // 6022

    // ═══════════════════════════════════════════════════════════════════════
    // CONFIG ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Fee rate is not below FEE_RATE_DENOMINATOR
    #[msg("Invalid fee rate")]
    InvalidFeeRate, // 6023

    /// Tick spacing is zero or above MAX_TICK_SPACING
    #[msg("Invalid tick spacing")]
    InvalidTickSpacing, // 6024

    /// Per-reward inputs don't line up with the pool's reward infos
    #[msg("Invalid reward input")]
    InvalidRewardInput, // 6025
}

impl ClmmError {
    /// Raise this error with the offending value attached
    pub fn with_value(self, label: &str, value: impl ToString) -> Error {
        Error::from(self).with_values((label, value.to_string()))
    }
}

/// Variant name carried by an error raised from this crate, if any
pub fn error_name(err: &Error) -> Option<&str> {
    match err {
        Error::AnchorError(e) => Some(e.error_name.as_str()),
        Error::ProgramError(_) => None,
    }
}

/// Whether the caller can recover by fetching a wider range of tick arrays
/// and quoting again
pub fn is_refetchable(err: &Error) -> bool {
    let Error::AnchorError(e) = err else {
        return false;
    };
    [ClmmError::NoInitializedTickArray, ClmmError::InsufficientLiquidity]
        .into_iter()
        .any(|code| e.error_code_number == u32::from(code))
}
