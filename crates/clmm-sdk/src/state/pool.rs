use crate::constants::{MAX_TICK, MIN_TICK, REWARD_NUM, TICK_ARRAY_BITMAP_WORDS};
use crate::errors::ClmmError;
use crate::math::bit_math::U1024;
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use crate::state::config::AmmConfig;
use crate::state::tick_array_bitmap::merge_tick_array_bitmap;
use crate::utils::validate_token_order;
use anchor_lang::prelude::*;

/// Reward emission schedule carried by a pool
///
/// An entry whose `token_mint` is the default key is an unused slot.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardInfo {
    /// Emission start, unix seconds
    pub open_time: u64,

    /// Emission end, unix seconds
    pub end_time: u64,

    /// Last time `reward_growth_global_x64` was brought up to date
    pub last_update_time: u64,

    /// Reward tokens emitted per second (Q64.64)
    pub emissions_per_second_x64: u128,

    /// Total reward tokens emitted so far
    pub reward_total_emissioned: u64,

    /// Reward tokens already claimed by positions
    pub reward_claimed: u64,

    /// Reward token mint
    pub token_mint: Pubkey,

    /// Reward growth per unit of liquidity (Q64.64)
    pub reward_growth_global_x64: u128,
}

impl RewardInfo {
    /// Check if this reward slot is in use
    pub fn initialized(&self) -> bool {
        self.token_mint != Pubkey::default()
    }

    /// Whether rewards are being emitted at `chain_time`
    pub fn is_active(&self, chain_time: u64) -> bool {
        self.initialized()
            && self.emissions_per_second_x64 > 0
            && chain_time >= self.open_time
            && chain_time < self.end_time
    }
}

/// Pool state - the decoded snapshot of a CLMM pool a quote runs against
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolState {
    /// Program that owns the pool and its tick arrays
    pub program_id: Pubkey,

    /// Pool account address
    pub id: Pubkey,

    /// Token A mint (must be < token B mint lexicographically)
    pub mint_a: Pubkey,

    /// Token B mint
    pub mint_b: Pubkey,

    pub mint_decimals_a: u8,
    pub mint_decimals_b: u8,

    /// Fee tier this pool was created with
    pub amm_config: AmmConfig,

    /// Total liquidity currently in range
    pub liquidity: u128,

    /// Current sqrt price as Q64.64 fixed point
    pub sqrt_price_x64: u128,

    /// Current tick index
    pub tick_current: i32,

    /// Global fee growth for token A (Q64.64, wraps)
    pub fee_growth_global_a_x64: u128,

    /// Global fee growth for token B (Q64.64, wraps)
    pub fee_growth_global_b_x64: u128,

    /// One bit per tick array, see `state::tick_array_bitmap`
    pub tick_array_bitmap: [u64; TICK_ARRAY_BITMAP_WORDS],

    /// Reward emission schedules
    pub reward_infos: [RewardInfo; REWARD_NUM],
}

impl PoolState {
    /// Tick spacing for this pool
    pub fn tick_spacing(&self) -> u16 {
        self.amm_config.tick_spacing
    }

    /// Tick array bitmap as a single 1024-bit value
    pub fn tick_array_bitmap(&self) -> U1024 {
        merge_tick_array_bitmap(&self.tick_array_bitmap)
    }

    /// Reward growth globals, in reward slot order
    pub fn reward_growths_global_x64(&self) -> [u128; REWARD_NUM] {
        self.reward_infos.map(|info| info.reward_growth_global_x64)
    }

    /// Decimals of `mint`, or `InvalidTokenMint` if it is neither pool mint
    pub fn mint_decimals(&self, mint: &Pubkey) -> Result<u8> {
        if *mint == self.mint_a {
            Ok(self.mint_decimals_a)
        } else if *mint == self.mint_b {
            Ok(self.mint_decimals_b)
        } else {
            Err(Error::from(ClmmError::InvalidTokenMint)
                .with_account_name(self.id.to_string())
                .with_values(("mint", mint.to_string())))
        }
    }

    /// Check the snapshot is internally consistent before quoting against it
    pub fn validate(&self) -> Result<()> {
        self.amm_config
            .validate()
            .map_err(|e| e.with_account_name(self.id.to_string()))?;

        if !validate_token_order(&self.mint_a, &self.mint_b) {
            return Err(Error::from(ClmmError::InvalidTokenMint).with_account_name(self.id.to_string()));
        }

        if !(MIN_TICK..=MAX_TICK).contains(&self.tick_current) {
            return Err(ClmmError::InvalidTick.with_value("tick_current", self.tick_current));
        }

        // tick_current is the tick the sqrt price falls in, or the one below
        // when a downward swap stopped exactly on a crossed tick
        let tick_at_price = get_tick_at_sqrt_price(self.sqrt_price_x64)?;
        let consistent = tick_at_price == self.tick_current
            || (tick_at_price - 1 == self.tick_current
                && get_sqrt_price_at_tick(tick_at_price)? == self.sqrt_price_x64);
        if !consistent {
            return Err(Error::from(ClmmError::InvalidPrice)
                .with_account_name(self.id.to_string())
                .with_values((tick_at_price.to_string(), self.tick_current.to_string())));
        }
        Ok(())
    }
}
