//! Account addressing and ordering helpers

use crate::constants::seeds::TICK_ARRAY_SEED;
use anchor_lang::prelude::*;

/// Validate token ordering (token A must be < token B lexicographically)
pub fn validate_token_order(mint_a: &Pubkey, mint_b: &Pubkey) -> bool {
    mint_a.to_bytes() < mint_b.to_bytes()
}

/// Tick-array PDA
/// Seeds: ["tick_array", pool_id, start_tick_index.to_be_bytes()]
pub fn get_pda_tick_array_address(program_id: &Pubkey, pool_id: &Pubkey, start_tick_index: i32) -> Pubkey {
    Pubkey::find_program_address(
        &[TICK_ARRAY_SEED, pool_id.as_ref(), &start_tick_index.to_be_bytes()],
        program_id,
    )
    .0
}
