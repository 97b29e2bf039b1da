use soroban_sdk::{Address, Env};

use crate::error::VaultError;
use crate::interfaces::RoleManagerClient;
use crate::storage::read_role_manager;

/// Which kind of flow an entry point belongs to, for pause checks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Deposit,
    Withdrawal,
    Reporting,
}

fn roles(env: &Env) -> RoleManagerClient<'_> {
    RoleManagerClient::new(env, &read_role_manager(env))
}

pub fn require_owner(env: &Env) -> Address {
    let owner = roles(env).owner();
    owner.require_auth();
    owner
}

pub fn is_privileged(env: &Env, caller: &Address) -> bool {
    let roles = roles(env);
    *caller == roles.owner() || roles.is_operator(caller)
}

/// `caller` must sign and be the owner or a registered operator.
pub fn require_operator(env: &Env, caller: &Address) -> Result<(), VaultError> {
    caller.require_auth();
    if !is_privileged(env, caller) {
        return Err(VaultError::Unauthorized);
    }
    Ok(())
}

pub fn require_open(env: &Env, flow: Flow) -> Result<(), VaultError> {
    let roles = roles(env);
    if roles.paused() {
        return Err(VaultError::Paused);
    }
    match flow {
        Flow::Deposit if roles.deposits_paused() => Err(VaultError::DepositsPaused),
        Flow::Withdrawal if roles.withdrawals_paused() => Err(VaultError::WithdrawalsPaused),
        _ => Ok(()),
    }
}
