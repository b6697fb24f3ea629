use crate::constants::{FEE_RATE_DENOMINATOR, MAX_TICK_SPACING};
use crate::errors::ClmmError;
use anchor_lang::prelude::*;

/// Fee and spacing configuration shared by every pool of a fee tier
///
/// All rates are numerators over FEE_RATE_DENOMINATOR. `trade_fee_rate` is
/// what the trader pays; protocol and fund rates are the shares of that fee
/// set aside before LPs are credited.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmmConfig {
    /// Fee charged on swap input
    pub trade_fee_rate: u32,

    /// Share of the trade fee kept by the protocol
    pub protocol_fee_rate: u32,

    /// Share of the trade fee sent to the fund
    pub fund_fee_rate: u32,

    /// Tick spacing for pools using this config
    pub tick_spacing: u16,
}

impl AmmConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_spacing == 0 || self.tick_spacing > MAX_TICK_SPACING {
            return Err(ClmmError::InvalidTickSpacing.with_value("tick_spacing", self.tick_spacing));
        }
        if self.trade_fee_rate >= FEE_RATE_DENOMINATOR {
            return Err(ClmmError::InvalidFeeRate.with_value("trade_fee_rate", self.trade_fee_rate));
        }
        let shares = u64::from(self.protocol_fee_rate) + u64::from(self.fund_fee_rate);
        if shares > u64::from(FEE_RATE_DENOMINATOR) {
            return Err(ClmmError::InvalidFeeRate.with_value("protocol_and_fund_fee_rate", shares));
        }
        Ok(())
    }
}
