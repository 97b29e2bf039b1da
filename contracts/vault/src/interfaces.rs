//! Collaborators the vault consumes but does not own.

use soroban_sdk::{contractclient, Address, Env};

/// Fungible share ledger. The vault must be its minter.
#[contractclient(name = "ShareLedgerClient")]
pub trait ShareLedgerInterface {
    fn mint(env: Env, to: Address, amount: i128);
    fn burn(env: Env, from: Address, amount: i128);
    fn transfer(env: Env, from: Address, to: Address, amount: i128);
    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128);
    fn balance(env: Env, id: Address) -> i128;
    fn total_supply(env: Env) -> i128;
    fn decimals(env: Env) -> u32;
}

/// Owner/operator identity and pause switches, queried by value.
#[contractclient(name = "RoleManagerClient")]
pub trait RoleManagerInterface {
    fn owner(env: Env) -> Address;
    fn is_operator(env: Env, addr: Address) -> bool;
    fn paused(env: Env) -> bool;
    fn deposits_paused(env: Env) -> bool;
    fn withdrawals_paused(env: Env) -> bool;
}
