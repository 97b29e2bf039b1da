//! Yield reporting and fee collection.
//!
//! Fees are charged on each positive reported delta. The treasury is paid
//! in freshly minted shares priced after the yield lands, so its new
//! shares are worth exactly the fee and no asset moves.

use soroban_sdk::{panic_with_error, Env};

use crate::error::VaultError;
use crate::events::YieldEvent;
use crate::interfaces::ShareLedgerClient;
use crate::math::{apply_bps, mul_div, Rounding};
use crate::nav::{record_yield, total_assets, Pricing};
use crate::storage::{
    read_fee_bps, read_last_yield_report, read_max_yield_change_bps, read_share_token,
    read_treasury, write_last_yield_report,
};

pub const MAX_FEE_BPS: u32 = 3_000;

pub const MIN_REPORT_INTERVAL: u64 = 86_400; // 1 day

pub fn check_report_interval(last_report: Option<u64>, now: u64) -> Result<(), VaultError> {
    match last_report {
        Some(last) if now < last.saturating_add(MIN_REPORT_INTERVAL) => {
            Err(VaultError::ReportTooSoon)
        }
        _ => Ok(()),
    }
}

/// `|delta|` may not exceed `max_bps` of the current NAV. A zero bound or
/// an empty vault disables the check.
pub fn check_yield_bound(
    env: &Env,
    delta: i128,
    total_assets: i128,
    max_bps: u32,
) -> Result<(), VaultError> {
    if max_bps == 0 || total_assets == 0 {
        return Ok(());
    }
    let bound = apply_bps(env, total_assets, max_bps)?;
    if delta.unsigned_abs() > bound as u128 {
        return Err(VaultError::YieldChangeTooLarge);
    }
    Ok(())
}

/// The part of `delta` that actually raised NAV. A gain that only fills
/// a hole left by an earlier loss clamped at zero is not profit.
pub fn realized_gain(delta: i128, before: &Pricing, after: &Pricing) -> i128 {
    (after.total_assets - before.total_assets).clamp(0, delta.max(0))
}

/// Returns `(fee_assets, fee_shares)` for a `gain` already folded into
/// `after`.
pub fn fee_split(
    env: &Env,
    gain: i128,
    fee_bps: u32,
    after: &Pricing,
) -> Result<(i128, i128), VaultError> {
    if gain <= 0 || fee_bps == 0 || after.total_supply == 0 {
        return Ok((0, 0));
    }
    let fee = apply_bps(env, gain, fee_bps)?;
    let holders_value = after.total_assets - fee;
    if fee == 0 || holders_value <= 0 {
        return Ok((0, 0));
    }
    let fee_shares = mul_div(env, fee, after.total_supply, holders_value, Rounding::Down)?;
    Ok((fee, fee_shares))
}

/// Folds `delta` into NAV and mints the treasury's fee shares in the same
/// step. Caller has already checked roles and pause state.
pub fn report_yield(env: &Env, delta: i128) -> Result<YieldEvent, VaultError> {
    let now = env.ledger().timestamp();
    check_report_interval(read_last_yield_report(env), now)?;

    let before = Pricing::load(env);
    check_yield_bound(env, delta, before.total_assets, read_max_yield_change_bps(env))?;
    let price_before = before.share_price(env)?;

    let nav = record_yield(env, delta)?;
    let after = Pricing::new(total_assets(&nav), before.total_supply, before.scale);
    let gain = realized_gain(delta, &before, &after);

    let (fee_assets, fee_shares) = fee_split(env, gain, read_fee_bps(env), &after)?;
    if fee_assets > gain {
        panic_with_error!(env, VaultError::FeeExceedsProfit);
    }
    if fee_shares > 0 {
        ShareLedgerClient::new(env, &read_share_token(env))
            .mint(&read_treasury(env), &fee_shares);
    }
    write_last_yield_report(env, now);

    let settled = Pricing::new(
        after.total_assets,
        after.total_supply + fee_shares,
        after.scale,
    );
    Ok(YieldEvent {
        delta,
        gain,
        fee_assets,
        fee_shares,
        total_assets_before: before.total_assets,
        total_assets_after: settled.total_assets,
        price_before,
        price_after: settled.share_price(env)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_report_is_never_throttled() {
        assert_eq!(check_report_interval(None, 0), Ok(()));
        assert_eq!(
            check_report_interval(Some(1_000), 1_000 + 86_399),
            Err(VaultError::ReportTooSoon)
        );
        assert_eq!(check_report_interval(Some(1_000), 1_000 + 86_400), Ok(()));
    }

    #[test]
    fn yield_bound_is_symmetric() {
        let env = Env::default();
        // 5% of 1_000_000
        assert_eq!(check_yield_bound(&env, 50_000, 1_000_000, 500), Ok(()));
        assert_eq!(check_yield_bound(&env, -50_000, 1_000_000, 500), Ok(()));
        assert_eq!(
            check_yield_bound(&env, 50_001, 1_000_000, 500),
            Err(VaultError::YieldChangeTooLarge)
        );
        assert_eq!(
            check_yield_bound(&env, -50_001, 1_000_000, 500),
            Err(VaultError::YieldChangeTooLarge)
        );
    }

    #[test]
    fn yield_bound_skipped_when_disabled_or_empty() {
        let env = Env::default();
        assert_eq!(check_yield_bound(&env, i128::MAX, 1_000_000, 0), Ok(()));
        assert_eq!(check_yield_bound(&env, i128::MIN, 0, 500), Ok(()));
    }

    #[test]
    fn gain_is_the_rise_in_nav() {
        let before = Pricing::new(1_000, 1_000, 1);
        let after = Pricing::new(1_070, 1_000, 1);
        assert_eq!(realized_gain(70, &before, &after), 70);
        assert_eq!(realized_gain(-30, &before, &Pricing::new(970, 1_000, 1)), 0);

        // net was -50 below the clamp; +70 only lifts NAV from 0 to 20
        let before = Pricing::new(0, 1_000, 1);
        let after = Pricing::new(20, 1_000, 1);
        assert_eq!(realized_gain(70, &before, &after), 20);

        // still under water after the report
        assert_eq!(realized_gain(30, &before, &before), 0);
    }

    #[test]
    fn fee_shares_are_worth_the_fee_at_the_new_price() {
        let env = Env::default();
        // 100_000 deposited, +10_000 yield, 20% fee
        let after = Pricing::new(1_100_000_000_000, 1_000_000_000_000, 1);
        let (fee, fee_shares) = fee_split(&env, 100_000_000_000, 2_000, &after).unwrap();
        assert_eq!(fee, 20_000_000_000);
        assert_eq!(fee_shares, 18_518_518_518);

        let minted = Pricing::new(after.total_assets, after.total_supply + fee_shares, 1);
        let value = minted
            .shares_to_assets(&env, fee_shares, Rounding::Down)
            .unwrap();
        assert!(value <= fee && fee - value <= 1);
    }

    #[test]
    fn no_fee_without_profit() {
        let env = Env::default();
        let after = Pricing::new(900, 1_000, 1);
        assert_eq!(fee_split(&env, -100, 2_000, &after), Ok((0, 0)));
        assert_eq!(fee_split(&env, 0, 2_000, &after), Ok((0, 0)));
        assert_eq!(fee_split(&env, 100, 0, &after), Ok((0, 0)));
    }

    #[test]
    fn no_fee_on_an_empty_book() {
        let env = Env::default();
        let after = Pricing::new(500, 0, 1);
        assert_eq!(fee_split(&env, 500, 2_000, &after), Ok((0, 0)));
    }

    #[test]
    fn dust_yield_rounds_fee_to_zero() {
        let env = Env::default();
        let after = Pricing::new(1_000_004, 1_000_000, 1);
        // 4 * 20% = 0.8, floored
        assert_eq!(fee_split(&env, 4, 2_000, &after), Ok((0, 0)));
    }
}
