use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::error::VaultError;
use crate::types::{ConfigParam, NavState, PendingChange, WithdrawalRequest};

// ---------- TTL constants ----------
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800;   // ~7 days
const INSTANCE_BUMP_AMOUNT: u32 = 518_400;          // bump to ~30 days
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 518_400; // ~30 days
const PERSISTENT_BUMP_AMOUNT: u32 = 3_110_400;      // bump to ~180 days

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    RoleManager,
    Asset,
    ShareToken,
    Treasury,
    Custodian,
    FeeBps,
    Cooldown,
    BufferBps,
    MaxYieldChangeBps,
    // 10^(share decimals - asset decimals)
    DecimalsScale,
    Nav,
    LastYieldReport,
    PendingShares,
    QueueHead,
    QueueLength,
    Request(u64),
    PendingCount(Address),
    Pending(ConfigParam),
    Locked,
}

// --- TTL helpers ---

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::RoleManager)
}

fn read_address(env: &Env, key: &DataKey) -> Address {
    env.storage()
        .instance()
        .get(key)
        .unwrap_or_else(|| panic_with_error!(env, VaultError::NotInitialized))
}

// ============ COLLABORATORS ============

pub fn read_role_manager(env: &Env) -> Address {
    read_address(env, &DataKey::RoleManager)
}

pub fn write_role_manager(env: &Env, roles: &Address) {
    env.storage().instance().set(&DataKey::RoleManager, roles);
}

pub fn read_asset(env: &Env) -> Address {
    read_address(env, &DataKey::Asset)
}

pub fn write_asset(env: &Env, asset: &Address) {
    env.storage().instance().set(&DataKey::Asset, asset);
}

pub fn read_share_token(env: &Env) -> Address {
    read_address(env, &DataKey::ShareToken)
}

pub fn write_share_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::ShareToken, token);
}

pub fn read_treasury(env: &Env) -> Address {
    read_address(env, &DataKey::Treasury)
}

pub fn write_treasury(env: &Env, treasury: &Address) {
    env.storage().instance().set(&DataKey::Treasury, treasury);
}

pub fn read_custodian(env: &Env) -> Address {
    read_address(env, &DataKey::Custodian)
}

pub fn write_custodian(env: &Env, custodian: &Address) {
    env.storage().instance().set(&DataKey::Custodian, custodian);
}

// ============ PARAMETERS ============

pub fn read_fee_bps(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::FeeBps).unwrap_or(0)
}

pub fn write_fee_bps(env: &Env, bps: u32) {
    env.storage().instance().set(&DataKey::FeeBps, &bps);
}

pub fn read_cooldown(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::Cooldown).unwrap_or(0)
}

pub fn write_cooldown(env: &Env, seconds: u64) {
    env.storage().instance().set(&DataKey::Cooldown, &seconds);
}

pub fn read_buffer_bps(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::BufferBps).unwrap_or(0)
}

pub fn write_buffer_bps(env: &Env, bps: u32) {
    env.storage().instance().set(&DataKey::BufferBps, &bps);
}

pub fn read_max_yield_change_bps(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::MaxYieldChangeBps)
        .unwrap_or(0)
}

pub fn write_max_yield_change_bps(env: &Env, bps: u32) {
    env.storage().instance().set(&DataKey::MaxYieldChangeBps, &bps);
}

pub fn read_decimals_scale(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::DecimalsScale)
        .unwrap_or_else(|| panic_with_error!(env, VaultError::NotInitialized))
}

pub fn write_decimals_scale(env: &Env, scale: i128) {
    env.storage().instance().set(&DataKey::DecimalsScale, &scale);
}

// ============ NAV ============

pub fn read_nav(env: &Env) -> NavState {
    env.storage()
        .instance()
        .get(&DataKey::Nav)
        .unwrap_or_default()
}

pub fn write_nav(env: &Env, nav: &NavState) {
    env.storage().instance().set(&DataKey::Nav, nav);
}

pub fn read_last_yield_report(env: &Env) -> Option<u64> {
    env.storage().instance().get(&DataKey::LastYieldReport)
}

pub fn write_last_yield_report(env: &Env, timestamp: u64) {
    env.storage()
        .instance()
        .set(&DataKey::LastYieldReport, &timestamp);
}

// ============ WITHDRAWAL QUEUE ============

pub fn read_pending_shares(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::PendingShares)
        .unwrap_or(0)
}

pub fn write_pending_shares(env: &Env, shares: i128) {
    env.storage().instance().set(&DataKey::PendingShares, &shares);
}

pub fn read_queue_head(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::QueueHead).unwrap_or(0)
}

pub fn write_queue_head(env: &Env, head: u64) {
    env.storage().instance().set(&DataKey::QueueHead, &head);
}

pub fn read_queue_length(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::QueueLength)
        .unwrap_or(0)
}

pub fn write_queue_length(env: &Env, length: u64) {
    env.storage().instance().set(&DataKey::QueueLength, &length);
}

pub fn read_request(env: &Env, id: u64) -> Option<WithdrawalRequest> {
    let key = DataKey::Request(id);
    let request: Option<WithdrawalRequest> = env.storage().persistent().get(&key);
    if request.is_some() {
        extend_persistent(env, &key);
    }
    request
}

pub fn write_request(env: &Env, id: u64, request: &WithdrawalRequest) {
    let key = DataKey::Request(id);
    env.storage().persistent().set(&key, request);
    extend_persistent(env, &key);
}

pub fn read_pending_count(env: &Env, holder: &Address) -> u32 {
    let key = DataKey::PendingCount(holder.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn write_pending_count(env: &Env, holder: &Address, count: u32) {
    let key = DataKey::PendingCount(holder.clone());
    if count == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &count);
        extend_persistent(env, &key);
    }
}

// ============ TIMELOCK ============

pub fn read_pending_change(env: &Env, param: ConfigParam) -> Option<PendingChange> {
    env.storage().instance().get(&DataKey::Pending(param))
}

pub fn write_pending_change(env: &Env, param: ConfigParam, change: &PendingChange) {
    env.storage().instance().set(&DataKey::Pending(param), change);
}

pub fn remove_pending_change(env: &Env, param: ConfigParam) {
    env.storage().instance().remove(&DataKey::Pending(param));
}

// ============ REENTRANCY LOCK ============

pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Locked)
}

pub fn set_locked(env: &Env, locked: bool) {
    if locked {
        env.storage().instance().set(&DataKey::Locked, &true);
    } else {
        env.storage().instance().remove(&DataKey::Locked);
    }
}
