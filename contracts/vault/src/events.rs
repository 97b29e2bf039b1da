use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::types::{ConfigParam, ConfigValue, PendingChange};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub assets: i128,
    pub shares: i128,
    pub price_before: i128,
    pub price_after: i128,
    pub total_assets_before: i128,
    pub total_assets_after: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestEvent {
    pub id: u64,
    pub shares: i128,
    pub pending_before: i128,
    pub pending_after: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CancelEvent {
    pub id: u64,
    pub shares: i128,
    pub pending_before: i128,
    pub pending_after: i128,
    pub holder_requests_before: u32,
    pub holder_requests_after: u32,
}

/// Asset moved between the vault and the custodian.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityEvent {
    pub amount: i128,
    pub balance_before: i128,
    pub balance_after: i128,
}

/// One escrowed request burned against an asset payout.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementEvent {
    pub id: u64,
    pub shares: i128,
    pub assets: i128,
    pub total_assets_before: i128,
    pub total_assets_after: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FulfillEvent {
    pub processed: u32,
    pub assets_paid: i128,
    pub head_before: u64,
    pub head_after: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct YieldEvent {
    pub delta: i128,
    // rise in NAV the delta caused, the fee base
    pub gain: i128,
    pub fee_assets: i128,
    pub fee_shares: i128,
    pub total_assets_before: i128,
    pub total_assets_after: i128,
    pub price_before: i128,
    pub price_after: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigAppliedEvent {
    pub old_value: ConfigValue,
    pub new_value: ConfigValue,
}

pub fn initialized(env: &Env, asset: &Address, share_token: &Address, scale: i128) {
    let topics = (symbol_short!("init"),);
    env.events()
        .publish(topics, (asset.clone(), share_token.clone(), scale));
}

pub fn deposit(env: &Env, depositor: &Address, event: DepositEvent) {
    let topics = (symbol_short!("deposit"), depositor.clone());
    env.events().publish(topics, event);
}

pub fn withdrawal_requested(env: &Env, requester: &Address, event: RequestEvent) {
    let topics = (symbol_short!("wd_req"), requester.clone());
    env.events().publish(topics, event);
}

pub fn withdrawal_settled(env: &Env, requester: &Address, event: SettlementEvent) {
    let topics = (symbol_short!("wd_done"), requester.clone());
    env.events().publish(topics, event);
}

// Out-of-order settlement by the owner
pub fn withdrawal_forced(env: &Env, requester: &Address, event: SettlementEvent) {
    let topics = (symbol_short!("wd_force"), requester.clone());
    env.events().publish(topics, event);
}

pub fn withdrawal_cancelled(env: &Env, requester: &Address, event: CancelEvent) {
    let topics = (symbol_short!("wd_cancel"), requester.clone());
    env.events().publish(topics, event);
}

pub fn fulfilled(env: &Env, event: FulfillEvent) {
    let topics = (symbol_short!("fulfill"),);
    env.events().publish(topics, event);
}

pub fn yield_reported(env: &Env, event: YieldEvent) {
    let topics = (symbol_short!("yield"),);
    env.events().publish(topics, event);
}

pub fn yield_bound_changed(env: &Env, old_bps: u32, new_bps: u32) {
    let topics = (symbol_short!("yld_bound"),);
    env.events().publish(topics, (old_bps, new_bps));
}

pub fn config_queued(env: &Env, param: ConfigParam, change: PendingChange) {
    let topics = (symbol_short!("cfg_queue"), param);
    env.events().publish(topics, change);
}

pub fn config_executed(env: &Env, param: ConfigParam, event: ConfigAppliedEvent) {
    let topics = (symbol_short!("cfg_exec"), param);
    env.events().publish(topics, event);
}

pub fn config_cancelled(env: &Env, param: ConfigParam, change: PendingChange) {
    let topics = (symbol_short!("cfg_cncl"), param);
    env.events().publish(topics, change);
}

pub fn liquidity_forwarded(env: &Env, custodian: &Address, event: LiquidityEvent) {
    let topics = (symbol_short!("liq_out"), custodian.clone());
    env.events().publish(topics, event);
}

pub fn liquidity_returned(env: &Env, custodian: &Address, event: LiquidityEvent) {
    let topics = (symbol_short!("liq_in"), custodian.clone());
    env.events().publish(topics, event);
}
