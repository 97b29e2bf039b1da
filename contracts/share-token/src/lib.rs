#![no_std]

//! Vault share token.
//!
//! A SEP-41 fungible token whose supply is controlled by a single minter,
//! the vault contract. Holders transfer and approve freely; only the
//! minter can create or destroy units.

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, String};
use soroban_token_sdk::TokenUtils;

mod error;
mod storage;

pub use error::TokenError;
use storage::{
    extend_balance, extend_instance, is_initialized, read_admin, read_allowance,
    read_balance, read_decimals, read_minter, read_name, read_symbol, read_total_supply,
    spend_allowance, write_admin, write_allowance, write_balance, write_metadata,
    write_minter, write_total_supply,
};

fn check_nonnegative(amount: i128) -> Result<(), TokenError> {
    if amount < 0 {
        return Err(TokenError::NegativeAmount);
    }
    Ok(())
}

fn debit(env: &Env, from: &Address, amount: i128) -> Result<(), TokenError> {
    let balance = read_balance(env, from);
    if balance < amount {
        return Err(TokenError::InsufficientBalance);
    }
    write_balance(env, from, balance - amount);
    Ok(())
}

fn credit(env: &Env, to: &Address, amount: i128) {
    let balance = read_balance(env, to);
    write_balance(env, to, balance + amount);
}

#[contract]
pub struct ShareToken;

#[contractimpl]
impl ShareToken {
    /// Initialize the share token.
    /// `admin`  - may rotate the minter and itself
    /// `minter` - the vault contract, the only address allowed to mint/burn
    pub fn initialize(
        env: Env,
        admin: Address,
        minter: Address,
        decimals: u32,
        name: String,
        symbol: String,
    ) -> Result<(), TokenError> {
        if is_initialized(&env) {
            return Err(TokenError::AlreadyInitialized);
        }

        write_admin(&env, &admin);
        write_minter(&env, &minter);
        write_metadata(&env, decimals, &name, &symbol);
        write_total_supply(&env, 0);
        extend_instance(&env);
        Ok(())
    }

    /// Upgrade the contract WASM. Only callable by admin.
    pub fn upgrade(env: Env, new_wasm_hash: BytesN<32>) {
        let admin = read_admin(&env);
        admin.require_auth();
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    /// Bump a holder's balance TTL. Anyone may call this.
    pub fn bump_balance(env: Env, holder: Address) {
        extend_balance(&env, &holder);
        extend_instance(&env);
    }

    pub fn mint(env: Env, to: Address, amount: i128) -> Result<(), TokenError> {
        check_nonnegative(amount)?;
        let minter = read_minter(&env);
        minter.require_auth();
        extend_instance(&env);

        credit(&env, &to, amount);
        write_total_supply(&env, read_total_supply(&env) + amount);

        TokenUtils::new(&env).events().mint(minter, to, amount);
        Ok(())
    }

    /// Minter-only burn. The vault uses it to destroy escrowed shares it holds.
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), TokenError> {
        check_nonnegative(amount)?;
        let minter = read_minter(&env);
        minter.require_auth();
        extend_instance(&env);

        debit(&env, &from, amount)?;
        write_total_supply(&env, read_total_supply(&env) - amount);

        TokenUtils::new(&env).events().burn(from, amount);
        Ok(())
    }

    /// Minter-only burn against an allowance granted to `spender`.
    pub fn burn_from(
        env: Env,
        spender: Address,
        from: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        check_nonnegative(amount)?;
        let minter = read_minter(&env);
        minter.require_auth();
        spender.require_auth();
        extend_instance(&env);

        spend_allowance(&env, &from, &spender, amount)?;
        debit(&env, &from, amount)?;
        write_total_supply(&env, read_total_supply(&env) - amount);

        TokenUtils::new(&env).events().burn(from, amount);
        Ok(())
    }

    // --- SEP-41 Token Interface ---

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        extend_instance(&env);
        read_allowance(&env, &from, &spender).amount
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), TokenError> {
        from.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);

        write_allowance(&env, &from, &spender, amount, expiration_ledger)?;

        TokenUtils::new(&env)
            .events()
            .approve(from, spender, amount, expiration_ledger);
        Ok(())
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        extend_instance(&env);
        read_balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);

        debit(&env, &from, amount)?;
        credit(&env, &to, amount);

        TokenUtils::new(&env).events().transfer(from, to, amount);
        Ok(())
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        spender.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);

        spend_allowance(&env, &from, &spender, amount)?;
        debit(&env, &from, amount)?;
        credit(&env, &to, amount);

        TokenUtils::new(&env).events().transfer(from, to, amount);
        Ok(())
    }

    pub fn total_supply(env: Env) -> i128 {
        extend_instance(&env);
        read_total_supply(&env)
    }

    pub fn decimals(env: Env) -> u32 {
        extend_instance(&env);
        read_decimals(&env)
    }

    pub fn name(env: Env) -> String {
        extend_instance(&env);
        read_name(&env)
    }

    pub fn symbol(env: Env) -> String {
        extend_instance(&env);
        read_symbol(&env)
    }

    // --- Admin functions ---

    /// Point minting at a new vault deployment.
    pub fn set_minter(env: Env, new_minter: Address) {
        let admin = read_admin(&env);
        admin.require_auth();
        extend_instance(&env);
        write_minter(&env, &new_minter);
    }

    pub fn set_admin(env: Env, new_admin: Address) {
        let admin = read_admin(&env);
        admin.require_auth();
        extend_instance(&env);
        write_admin(&env, &new_admin);
    }

    pub fn minter(env: Env) -> Address {
        extend_instance(&env);
        read_minter(&env)
    }

    pub fn admin(env: Env) -> Address {
        extend_instance(&env);
        read_admin(&env)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::testutils::{Address as _, Ledger};
    use soroban_sdk::{Env, String};

    fn setup_token(env: &Env) -> (ShareTokenClient<'_>, Address, Address) {
        let contract_id = env.register_contract(None, ShareToken);
        let client = ShareTokenClient::new(env, &contract_id);
        let admin = Address::generate(env);
        let minter = Address::generate(env);

        client.initialize(
            &admin,
            &minter,
            &7u32,
            &String::from_str(env, "Vault Share"),
            &String::from_str(env, "vSHR"),
        );

        (client, admin, minter)
    }

    #[test]
    fn test_initialize() {
        let env = Env::default();
        let (client, admin, minter) = setup_token(&env);
        assert_eq!(client.name(), String::from_str(&env, "Vault Share"));
        assert_eq!(client.symbol(), String::from_str(&env, "vSHR"));
        assert_eq!(client.decimals(), 7u32);
        assert_eq!(client.total_supply(), 0i128);
        assert_eq!(client.admin(), admin);
        assert_eq!(client.minter(), minter);
    }

    #[test]
    fn test_double_initialize_fails() {
        let env = Env::default();
        let (client, admin, minter) = setup_token(&env);
        let result = client.try_initialize(
            &admin,
            &minter,
            &7u32,
            &String::from_str(&env, "Vault Share"),
            &String::from_str(&env, "vSHR"),
        );
        assert_eq!(result, Err(Ok(TokenError::AlreadyInitialized)));
    }

    #[test]
    fn test_mint_and_burn() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let holder = Address::generate(&env);

        client.mint(&holder, &1_000_0000000i128);
        assert_eq!(client.balance(&holder), 1_000_0000000i128);
        assert_eq!(client.total_supply(), 1_000_0000000i128);

        client.burn(&holder, &400_0000000i128);
        assert_eq!(client.balance(&holder), 600_0000000i128);
        assert_eq!(client.total_supply(), 600_0000000i128);
    }

    #[test]
    fn test_burn_more_than_balance_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let holder = Address::generate(&env);

        client.mint(&holder, &100_0000000i128);
        let result = client.try_burn(&holder, &200_0000000i128);
        assert_eq!(result, Err(Ok(TokenError::InsufficientBalance)));
        assert_eq!(client.total_supply(), 100_0000000i128);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let holder = Address::generate(&env);

        assert_eq!(
            client.try_mint(&holder, &-1i128),
            Err(Ok(TokenError::NegativeAmount))
        );
    }

    #[test]
    fn test_transfer() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let alice = Address::generate(&env);
        let bob = Address::generate(&env);

        client.mint(&alice, &1_000_0000000i128);
        client.transfer(&alice, &bob, &300_0000000i128);
        assert_eq!(client.balance(&alice), 700_0000000i128);
        assert_eq!(client.balance(&bob), 300_0000000i128);

        let result = client.try_transfer(&bob, &alice, &300_0000001i128);
        assert_eq!(result, Err(Ok(TokenError::InsufficientBalance)));
    }

    #[test]
    fn test_approve_and_transfer_from() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let owner = Address::generate(&env);
        let spender = Address::generate(&env);
        let recipient = Address::generate(&env);

        client.mint(&owner, &1_000_0000000i128);
        client.approve(&owner, &spender, &500_0000000i128, &1000u32);
        assert_eq!(client.allowance(&owner, &spender), 500_0000000i128);

        client.transfer_from(&spender, &owner, &recipient, &200_0000000i128);
        assert_eq!(client.balance(&owner), 800_0000000i128);
        assert_eq!(client.balance(&recipient), 200_0000000i128);
        assert_eq!(client.allowance(&owner, &spender), 300_0000000i128);

        let result = client.try_transfer_from(&spender, &owner, &recipient, &300_0000001i128);
        assert_eq!(result, Err(Ok(TokenError::InsufficientAllowance)));
    }

    #[test]
    fn test_allowance_expires() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let owner = Address::generate(&env);
        let spender = Address::generate(&env);

        env.ledger().with_mut(|li| li.sequence_number = 100);
        client.approve(&owner, &spender, &50i128, &150u32);
        assert_eq!(client.allowance(&owner, &spender), 50);

        env.ledger().with_mut(|li| li.sequence_number = 151);
        assert_eq!(client.allowance(&owner, &spender), 0);

        let result = client.try_approve(&owner, &spender, &50i128, &150u32);
        assert_eq!(result, Err(Ok(TokenError::InvalidExpiration)));
    }

    #[test]
    fn test_burn_from_spends_allowance() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, _) = setup_token(&env);
        let owner = Address::generate(&env);
        let spender = Address::generate(&env);

        client.mint(&owner, &100i128);
        client.approve(&owner, &spender, &60i128, &1000u32);
        client.burn_from(&spender, &owner, &40i128);

        assert_eq!(client.balance(&owner), 60);
        assert_eq!(client.total_supply(), 60);
        assert_eq!(client.allowance(&owner, &spender), 20);
    }

    #[test]
    fn test_zero_balance_by_default() {
        let env = Env::default();
        let (client, _, _) = setup_token(&env);
        let stranger = Address::generate(&env);
        assert_eq!(client.balance(&stranger), 0);
    }

    #[test]
    fn test_set_minter() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _, minter) = setup_token(&env);
        let new_minter = Address::generate(&env);

        assert_eq!(client.minter(), minter);
        client.set_minter(&new_minter);
        assert_eq!(client.minter(), new_minter);
    }
}
