//! NAV accounting.
//!
//! Total assets are derived only from the vault's own counters, never from
//! its token balance, so asset sent straight to the vault cannot move the
//! share price.

use soroban_sdk::Env;

use crate::error::VaultError;
use crate::interfaces::ShareLedgerClient;
use crate::math::{mul_div, Rounding, PRICE_SCALE};
use crate::storage::{read_decimals_scale, read_nav, read_share_token, write_nav};
use crate::types::NavState;

/// `max(0, deposited - withdrawn + yield)`.
pub fn total_assets(nav: &NavState) -> i128 {
    let net = nav.cumulative_deposited - nav.cumulative_withdrawn + nav.accumulated_yield;
    net.max(0)
}

pub fn record_deposit(env: &Env, assets: i128) -> Result<NavState, VaultError> {
    let mut nav = read_nav(env);
    nav.cumulative_deposited = nav
        .cumulative_deposited
        .checked_add(assets)
        .ok_or(VaultError::ArithmeticOverflow)?;
    write_nav(env, &nav);
    Ok(nav)
}

pub fn record_withdrawal(env: &Env, assets: i128) -> Result<NavState, VaultError> {
    let mut nav = read_nav(env);
    nav.cumulative_withdrawn = nav
        .cumulative_withdrawn
        .checked_add(assets)
        .ok_or(VaultError::ArithmeticOverflow)?;
    write_nav(env, &nav);
    Ok(nav)
}

pub fn record_yield(env: &Env, delta: i128) -> Result<NavState, VaultError> {
    let mut nav = read_nav(env);
    nav.accumulated_yield = nav
        .accumulated_yield
        .checked_add(delta)
        .ok_or(VaultError::ArithmeticOverflow)?;
    write_nav(env, &nav);
    Ok(nav)
}

/// A consistent view of NAV and share supply at one instant.
///
/// Escrowed and treasury shares are part of `total_supply` like any
/// other shares, so the price applies to all of them alike.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pricing {
    pub total_assets: i128,
    pub total_supply: i128,
    // share units per asset unit at the initial price
    pub scale: i128,
}

impl Pricing {
    pub fn new(total_assets: i128, total_supply: i128, scale: i128) -> Self {
        Self {
            total_assets,
            total_supply,
            scale,
        }
    }

    pub fn load(env: &Env) -> Self {
        let supply = ShareLedgerClient::new(env, &read_share_token(env)).total_supply();
        Self::new(total_assets(&read_nav(env)), supply, read_decimals_scale(env))
    }

    /// Asset value of one whole share, `PRICE_SCALE` == 1.0.
    pub fn share_price(&self, env: &Env) -> Result<i128, VaultError> {
        if self.total_supply == 0 {
            return Ok(PRICE_SCALE);
        }
        let numerator_scale = PRICE_SCALE
            .checked_mul(self.scale)
            .ok_or(VaultError::ArithmeticOverflow)?;
        mul_div(
            env,
            self.total_assets,
            numerator_scale,
            self.total_supply,
            Rounding::Down,
        )
    }

    pub fn assets_to_shares(
        &self,
        env: &Env,
        assets: i128,
        rounding: Rounding,
    ) -> Result<i128, VaultError> {
        if self.total_supply == 0 {
            return mul_div(env, assets, self.scale, 1, rounding);
        }
        if self.total_assets == 0 {
            return Err(VaultError::ZeroNav);
        }
        mul_div(env, assets, self.total_supply, self.total_assets, rounding)
    }

    pub fn shares_to_assets(
        &self,
        env: &Env,
        shares: i128,
        rounding: Rounding,
    ) -> Result<i128, VaultError> {
        if self.total_supply == 0 {
            return mul_div(env, shares, 1, self.scale, rounding);
        }
        mul_div(env, shares, self.total_assets, self.total_supply, rounding)
    }

    /// The snapshot after `shares` were burned against `assets` paid out.
    pub fn after_redeem(&self, shares: i128, assets: i128) -> Self {
        Self::new(
            (self.total_assets - assets).max(0),
            self.total_supply - shares,
            self.scale,
        )
    }
}
