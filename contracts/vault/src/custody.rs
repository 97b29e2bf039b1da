//! Liquidity held by the vault versus the external custodian.

use soroban_sdk::{token, Address, Env};

use crate::error::VaultError;
use crate::events::{self, LiquidityEvent};
use crate::math::{apply_bps, Rounding};
use crate::nav::Pricing;
use crate::storage::{read_asset, read_buffer_bps, read_custodian, read_pending_shares};

pub fn available_liquidity(env: &Env) -> i128 {
    token::Client::new(env, &read_asset(env)).balance(&env.current_contract_address())
}

/// Asset the vault keeps on hand: the buffer share of NAV plus the value
/// of every queued withdrawal.
pub fn buffer_target(env: &Env) -> Result<i128, VaultError> {
    let pricing = Pricing::load(env);
    let buffer = apply_bps(env, pricing.total_assets, read_buffer_bps(env))?;
    let reserved = pricing.shares_to_assets(env, read_pending_shares(env), Rounding::Up)?;
    buffer
        .checked_add(reserved)
        .ok_or(VaultError::ArithmeticOverflow)
}

/// Send everything above the buffer target to the custodian. Returns the
/// amount forwarded.
pub fn forward_excess(env: &Env) -> Result<i128, VaultError> {
    let held = available_liquidity(env);
    let excess = held - buffer_target(env)?;
    if excess <= 0 {
        return Ok(0);
    }

    let custodian = read_custodian(env);
    token::Client::new(env, &read_asset(env)).transfer(
        &env.current_contract_address(),
        &custodian,
        &excess,
    );
    events::liquidity_forwarded(
        env,
        &custodian,
        LiquidityEvent {
            amount: excess,
            balance_before: held,
            balance_after: held - excess,
        },
    );
    Ok(excess)
}

/// Pull `amount` back from the custodian. NAV is untouched; the asset was
/// already counted.
pub fn return_liquidity(env: &Env, custodian: &Address, amount: i128) -> Result<(), VaultError> {
    if amount <= 0 {
        return Err(VaultError::InvalidAmount);
    }
    if *custodian != read_custodian(env) {
        return Err(VaultError::Unauthorized);
    }

    let balance_before = available_liquidity(env);
    token::Client::new(env, &read_asset(env)).transfer(
        custodian,
        &env.current_contract_address(),
        &amount,
    );
    events::liquidity_returned(
        env,
        custodian,
        LiquidityEvent {
            amount,
            balance_before,
            balance_after: available_liquidity(env),
        },
    );
    Ok(())
}
