//! Staged changes to sensitive parameters.
//!
//! Each parameter has one slot. A slot is `Idle` until a change is queued,
//! then `Queued` until it is executed or cancelled, after which it is
//! `Idle` again.

use soroban_sdk::Env;

use crate::error::VaultError;
use crate::fees::MAX_FEE_BPS;
use crate::math::BPS_DENOMINATOR;
use crate::storage::{
    read_buffer_bps, read_cooldown, read_custodian, read_fee_bps, read_pending_change,
    read_treasury, remove_pending_change, write_buffer_bps, write_cooldown, write_custodian,
    write_fee_bps, write_pending_change, write_treasury,
};
use crate::types::{ConfigParam, ConfigValue, PendingChange};

const HOUR: u64 = 3_600;
const DAY: u64 = 24 * HOUR;

pub const MAX_COOLDOWN: u64 = 30 * DAY;

pub fn delay(param: ConfigParam) -> u64 {
    match param {
        ConfigParam::FeeRate => 2 * DAY,
        ConfigParam::Treasury => 2 * DAY,
        ConfigParam::Custodian => 7 * DAY,
        ConfigParam::Cooldown => DAY,
        ConfigParam::LiquidityBuffer => 6 * HOUR,
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Slot {
    Idle,
    Queued(PendingChange),
}

pub fn slot(env: &Env, param: ConfigParam) -> Slot {
    match read_pending_change(env, param) {
        Some(change) => Slot::Queued(change),
        None => Slot::Idle,
    }
}

/// Bounds check shared by `initialize` and `queue`.
pub fn validate(env: &Env, param: ConfigParam, value: &ConfigValue) -> Result<(), VaultError> {
    match (param, value) {
        (ConfigParam::FeeRate, ConfigValue::Rate(bps)) => {
            if *bps > MAX_FEE_BPS {
                return Err(VaultError::InvalidFeeRate);
            }
        }
        (ConfigParam::LiquidityBuffer, ConfigValue::Rate(bps)) => {
            if *bps as i128 > BPS_DENOMINATOR {
                return Err(VaultError::InvalidBufferRate);
            }
        }
        (ConfigParam::Treasury | ConfigParam::Custodian, ConfigValue::Account(account)) => {
            if *account == env.current_contract_address() {
                return Err(VaultError::InvalidAddress);
            }
        }
        (ConfigParam::Cooldown, ConfigValue::Seconds(seconds)) => {
            if *seconds > MAX_COOLDOWN {
                return Err(VaultError::InvalidCooldown);
            }
        }
        _ => return Err(VaultError::InvalidConfigValue),
    }
    Ok(())
}

pub fn current(env: &Env, param: ConfigParam) -> ConfigValue {
    match param {
        ConfigParam::FeeRate => ConfigValue::Rate(read_fee_bps(env)),
        ConfigParam::Treasury => ConfigValue::Account(read_treasury(env)),
        ConfigParam::Custodian => ConfigValue::Account(read_custodian(env)),
        ConfigParam::Cooldown => ConfigValue::Seconds(read_cooldown(env)),
        ConfigParam::LiquidityBuffer => ConfigValue::Rate(read_buffer_bps(env)),
    }
}

/// Write a validated value into live configuration.
pub fn apply(env: &Env, param: ConfigParam, value: &ConfigValue) -> Result<(), VaultError> {
    match (param, value) {
        (ConfigParam::FeeRate, ConfigValue::Rate(bps)) => write_fee_bps(env, *bps),
        (ConfigParam::LiquidityBuffer, ConfigValue::Rate(bps)) => write_buffer_bps(env, *bps),
        (ConfigParam::Treasury, ConfigValue::Account(account)) => write_treasury(env, account),
        (ConfigParam::Custodian, ConfigValue::Account(account)) => write_custodian(env, account),
        (ConfigParam::Cooldown, ConfigValue::Seconds(seconds)) => write_cooldown(env, *seconds),
        _ => return Err(VaultError::InvalidConfigValue),
    }
    Ok(())
}

pub fn queue(
    env: &Env,
    param: ConfigParam,
    value: ConfigValue,
) -> Result<PendingChange, VaultError> {
    validate(env, param, &value)?;
    if let Slot::Queued(_) = slot(env, param) {
        return Err(VaultError::ChangeAlreadyQueued);
    }
    let change = PendingChange {
        value,
        eligible_at: env.ledger().timestamp().saturating_add(delay(param)),
    };
    write_pending_change(env, param, &change);
    Ok(change)
}

/// Applies the queued value once its delay has passed. Returns the
/// replaced and the new value.
pub fn execute(env: &Env, param: ConfigParam) -> Result<(ConfigValue, ConfigValue), VaultError> {
    let change = match slot(env, param) {
        Slot::Idle => return Err(VaultError::NoPendingChange),
        Slot::Queued(change) => change,
    };
    if env.ledger().timestamp() < change.eligible_at {
        return Err(VaultError::TimelockNotExpired);
    }

    let old_value = current(env, param);
    remove_pending_change(env, param);
    apply(env, param, &change.value)?;
    Ok((old_value, change.value))
}

pub fn cancel(env: &Env, param: ConfigParam) -> Result<PendingChange, VaultError> {
    match slot(env, param) {
        Slot::Idle => Err(VaultError::NoPendingChange),
        Slot::Queued(change) => {
            remove_pending_change(env, param);
            Ok(change)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShareVault;
    use soroban_sdk::testutils::{Address as _, Ledger};
    use soroban_sdk::Address;

    #[test]
    fn delays_grow_with_blast_radius() {
        assert!(delay(ConfigParam::LiquidityBuffer) < delay(ConfigParam::Cooldown));
        assert!(delay(ConfigParam::Cooldown) < delay(ConfigParam::FeeRate));
        assert!(delay(ConfigParam::FeeRate) < delay(ConfigParam::Custodian));
        assert_eq!(delay(ConfigParam::Treasury), delay(ConfigParam::FeeRate));
    }

    #[test]
    fn validate_rejects_out_of_bounds_and_mismatched_values() {
        let env = Env::default();
        let vault = env.register_contract(None, ShareVault);

        env.as_contract(&vault, || {
            assert_eq!(
                validate(&env, ConfigParam::FeeRate, &ConfigValue::Rate(3_001)),
                Err(VaultError::InvalidFeeRate)
            );
            assert_eq!(
                validate(&env, ConfigParam::LiquidityBuffer, &ConfigValue::Rate(10_001)),
                Err(VaultError::InvalidBufferRate)
            );
            assert_eq!(
                validate(&env, ConfigParam::Cooldown, &ConfigValue::Seconds(MAX_COOLDOWN + 1)),
                Err(VaultError::InvalidCooldown)
            );
            assert_eq!(
                validate(&env, ConfigParam::Custodian, &ConfigValue::Account(vault.clone())),
                Err(VaultError::InvalidAddress)
            );
            assert_eq!(
                validate(&env, ConfigParam::Treasury, &ConfigValue::Rate(1)),
                Err(VaultError::InvalidConfigValue)
            );
            assert_eq!(
                validate(&env, ConfigParam::FeeRate, &ConfigValue::Rate(MAX_FEE_BPS)),
                Ok(())
            );
        });
    }

    #[test]
    fn slot_walks_idle_queued_idle() {
        let env = Env::default();
        let vault = env.register_contract(None, ShareVault);
        let treasury = Address::generate(&env);
        env.ledger().with_mut(|li| li.timestamp = 1_000);

        env.as_contract(&vault, || {
            assert_eq!(slot(&env, ConfigParam::Treasury), Slot::Idle);
            write_treasury(&env, &Address::generate(&env));

            let queued = queue(
                &env,
                ConfigParam::Treasury,
                ConfigValue::Account(treasury.clone()),
            )
            .unwrap();
            assert_eq!(queued.eligible_at, 1_000 + 2 * DAY);
            assert_eq!(slot(&env, ConfigParam::Treasury), Slot::Queued(queued));
            assert_eq!(
                queue(&env, ConfigParam::Treasury, ConfigValue::Account(treasury.clone())),
                Err(VaultError::ChangeAlreadyQueued)
            );
            assert_eq!(
                execute(&env, ConfigParam::Treasury),
                Err(VaultError::TimelockNotExpired)
            );
        });

        env.ledger().with_mut(|li| li.timestamp = 1_000 + 2 * DAY);

        env.as_contract(&vault, || {
            let (_, new_value) = execute(&env, ConfigParam::Treasury).unwrap();
            assert_eq!(new_value, ConfigValue::Account(treasury.clone()));
            assert_eq!(read_treasury(&env), treasury);
            assert_eq!(slot(&env, ConfigParam::Treasury), Slot::Idle);
            assert_eq!(
                execute(&env, ConfigParam::Treasury),
                Err(VaultError::NoPendingChange)
            );
            assert_eq!(
                cancel(&env, ConfigParam::Treasury),
                Err(VaultError::NoPendingChange)
            );
        });
    }
}
