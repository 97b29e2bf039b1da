#![no_std]

//! Role manager for the vault: one owner, a set of operators and three
//! independent pause switches. The vault only ever reads from it.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short,
    Address, Env,
};

// ---------- TTL constants ----------
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800; // ~7 days
const INSTANCE_BUMP_AMOUNT: u32 = 518_400;        // bump to ~30 days
const OPERATOR_LIFETIME_THRESHOLD: u32 = 518_400; // ~30 days
const OPERATOR_BUMP_AMOUNT: u32 = 3_110_400;      // bump to ~180 days

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AccessError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Owner,
    Operator(Address),
    Paused,
    DepositsPaused,
    WithdrawalsPaused,
}

// --- Storage helpers ---

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn read_owner(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .unwrap_or_else(|| panic_with_error!(env, AccessError::NotInitialized))
}

fn read_flag(env: &Env, key: &DataKey) -> bool {
    env.storage().instance().get(key).unwrap_or(false)
}

fn write_flag(env: &Env, key: &DataKey, value: bool) {
    let owner = read_owner(env);
    owner.require_auth();
    extend_instance(env);
    env.storage().instance().set(key, &value);
}

#[contract]
pub struct AccessControl;

#[contractimpl]
impl AccessControl {
    pub fn initialize(env: Env, owner: Address) -> Result<(), AccessError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(AccessError::AlreadyInitialized);
        }
        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Paused, &false);
        env.storage().instance().set(&DataKey::DepositsPaused, &false);
        env.storage().instance().set(&DataKey::WithdrawalsPaused, &false);
        extend_instance(&env);
        Ok(())
    }

    pub fn owner(env: Env) -> Address {
        extend_instance(&env);
        read_owner(&env)
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) {
        let owner = read_owner(&env);
        owner.require_auth();
        extend_instance(&env);
        env.storage().instance().set(&DataKey::Owner, &new_owner);
        env.events()
            .publish((symbol_short!("owner"),), (owner, new_owner));
    }

    // ==========================================================
    // Operators
    // ==========================================================

    pub fn set_operator(env: Env, operator: Address, enabled: bool) {
        let owner = read_owner(&env);
        owner.require_auth();
        extend_instance(&env);

        let key = DataKey::Operator(operator.clone());
        if enabled {
            env.storage().persistent().set(&key, &true);
            env.storage()
                .persistent()
                .extend_ttl(&key, OPERATOR_LIFETIME_THRESHOLD, OPERATOR_BUMP_AMOUNT);
        } else {
            env.storage().persistent().remove(&key);
        }

        env.events()
            .publish((symbol_short!("operator"), operator), enabled);
    }

    pub fn is_operator(env: Env, addr: Address) -> bool {
        extend_instance(&env);
        let key = DataKey::Operator(addr);
        let enabled: bool = env.storage().persistent().get(&key).unwrap_or(false);
        if enabled {
            env.storage()
                .persistent()
                .extend_ttl(&key, OPERATOR_LIFETIME_THRESHOLD, OPERATOR_BUMP_AMOUNT);
        }
        enabled
    }

    // ==========================================================
    // Pause switches
    // ==========================================================

    pub fn set_paused(env: Env, paused: bool) {
        write_flag(&env, &DataKey::Paused, paused);
        env.events().publish((symbol_short!("paused"),), paused);
    }

    pub fn set_deposits_paused(env: Env, paused: bool) {
        write_flag(&env, &DataKey::DepositsPaused, paused);
        env.events().publish((symbol_short!("dep_pause"),), paused);
    }

    pub fn set_withdrawals_paused(env: Env, paused: bool) {
        write_flag(&env, &DataKey::WithdrawalsPaused, paused);
        env.events().publish((symbol_short!("wd_pause"),), paused);
    }

    pub fn paused(env: Env) -> bool {
        extend_instance(&env);
        read_flag(&env, &DataKey::Paused)
    }

    pub fn deposits_paused(env: Env) -> bool {
        extend_instance(&env);
        read_flag(&env, &DataKey::DepositsPaused)
    }

    pub fn withdrawals_paused(env: Env) -> bool {
        extend_instance(&env);
        read_flag(&env, &DataKey::WithdrawalsPaused)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::Env;

    fn setup(env: &Env) -> (AccessControlClient<'_>, Address) {
        let contract_id = env.register_contract(None, AccessControl);
        let client = AccessControlClient::new(env, &contract_id);
        let owner = Address::generate(env);
        client.initialize(&owner);
        (client, owner)
    }

    #[test]
    fn test_initialize() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, owner) = setup(&env);
        assert_eq!(client.owner(), owner);
        assert!(!client.paused());
        assert!(!client.deposits_paused());
        assert!(!client.withdrawals_paused());
    }

    #[test]
    fn test_double_initialize_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, owner) = setup(&env);
        assert_eq!(
            client.try_initialize(&owner),
            Err(Ok(AccessError::AlreadyInitialized))
        );
    }

    #[test]
    fn test_operators() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _) = setup(&env);
        let keeper = Address::generate(&env);

        assert!(!client.is_operator(&keeper));
        client.set_operator(&keeper, &true);
        assert!(client.is_operator(&keeper));
        client.set_operator(&keeper, &false);
        assert!(!client.is_operator(&keeper));
    }

    #[test]
    fn test_pause_flags_are_independent() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _) = setup(&env);

        client.set_deposits_paused(&true);
        assert!(client.deposits_paused());
        assert!(!client.withdrawals_paused());
        assert!(!client.paused());

        client.set_withdrawals_paused(&true);
        client.set_paused(&true);
        assert!(client.withdrawals_paused());
        assert!(client.paused());

        client.set_paused(&false);
        assert!(!client.paused());
        assert!(client.deposits_paused());
    }

    #[test]
    fn test_transfer_ownership() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _) = setup(&env);
        let next = Address::generate(&env);

        client.transfer_ownership(&next);
        assert_eq!(client.owner(), next);
    }
}
