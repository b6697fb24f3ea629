//! CLMM SDK - off-chain quoting for a concentrated liquidity AMM on Solana
//!
//! Replays the on-chain program's tick math and swap loop against decoded
//! account snapshots, so a client can quote a trade, list the tick array
//! accounts the transaction needs, and report position fees, rewards and
//! APR estimates without sending anything.
//!
//! ## Architecture
//!
//! - **Math**: Q64.64 fixed point with 256/512-bit intermediates, tick <-> sqrt price
//! - **State**: pool, tick, tick array (60 ticks) and position snapshots
//! - **Bitmap**: 1024-bit index of initialized tick arrays
//! - **Quote**: swap simulation, tick prices, position fees/rewards, reward accrual, APR
//!
//! ## Conventions
//!
//! - Every fallible call returns `anchor_lang::Result`, with `ClmmError` codes
//! - All arithmetic is checked; fee and reward growth counters wrap like on chain
//! - Logging goes through `tracing`, routed by the caller's `ClmmContext`

pub mod constants;
pub mod context;
pub mod errors;
pub mod math;
pub mod quote;
pub mod state;
pub mod utils;

pub use context::ClmmContext;
pub use errors::{is_refetchable, ClmmError};
pub use quote::{
    compute_amount_in, compute_amount_out, estimate_aprs_for_price_range_delta,
    estimate_aprs_for_price_range_multiplier, get_position_amounts, get_position_fees, get_position_rewards,
    get_price_and_tick, get_tick_price, swap_compute, update_pool_reward_infos, TickArrayCache,
};
pub use state::{AmmConfig, PersonalPositionState, PoolState, RewardInfo, TickArrayState, TickState};
