#![no_std]

//! Share vault.
//!
//! Users deposit a base asset for shares, queue share redemptions behind a
//! cooldown, and are paid in arrival order as liquidity allows. Yield is
//! reported by an operator and a fee on positive yield is minted to the
//! treasury as shares. Roles and pause switches come from an external
//! role manager; share balances live in an external share ledger.

use soroban_sdk::{contract, contractimpl, log, token, Address, BytesN, Env};

mod access;
mod custody;
mod error;
mod events;
mod fees;
mod guard;
mod interfaces;
mod math;
mod nav;
mod queue;
mod storage;
mod timelock;
mod types;

pub use error::VaultError;
pub use fees::{MAX_FEE_BPS, MIN_REPORT_INTERVAL};
pub use interfaces::{
    RoleManagerClient, RoleManagerInterface, ShareLedgerClient, ShareLedgerInterface,
};
pub use math::PRICE_SCALE;
pub use queue::{CANCEL_GRACE_PERIOD, MAX_PENDING_PER_HOLDER};
pub use timelock::MAX_COOLDOWN;
pub use types::{ConfigParam, ConfigValue, NavState, PendingChange, WithdrawalRequest};

use access::{require_open, require_operator, require_owner, Flow};
use events::{ConfigAppliedEvent, DepositEvent};
use guard::ReentrancyGuard;
use math::{decimals_scale, Rounding, BPS_DENOMINATOR};
use nav::{record_deposit, Pricing};
use storage::{
    extend_instance, is_initialized, read_buffer_bps, read_cooldown, read_custodian,
    read_fee_bps, read_last_yield_report, read_max_yield_change_bps, read_nav,
    read_pending_count, read_pending_shares, read_queue_head, read_queue_length, read_request,
    read_share_token, read_treasury, write_asset, write_buffer_bps, write_cooldown,
    write_custodian, write_decimals_scale, write_fee_bps, write_max_yield_change_bps,
    write_role_manager, write_share_token, write_treasury,
};

#[contract]
pub struct ShareVault;

#[contractimpl]
impl ShareVault {
    /// Initialize the vault.
    /// `roles`       - role manager; its owner must authorize
    /// `share_token` - share ledger; the vault must already be its minter
    /// `custodian`   - receives liquidity above the buffer target
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        roles: Address,
        asset: Address,
        share_token: Address,
        treasury: Address,
        custodian: Address,
        fee_bps: u32,
        cooldown: u64,
        buffer_bps: u32,
        max_yield_change_bps: u32,
    ) -> Result<(), VaultError> {
        if is_initialized(&env) {
            return Err(VaultError::AlreadyInitialized);
        }
        RoleManagerClient::new(&env, &roles).owner().require_auth();

        let vault = env.current_contract_address();
        if asset == vault || share_token == vault || asset == share_token || roles == vault {
            return Err(VaultError::InvalidAddress);
        }
        let initial = [
            (ConfigParam::FeeRate, ConfigValue::Rate(fee_bps)),
            (ConfigParam::Cooldown, ConfigValue::Seconds(cooldown)),
            (ConfigParam::LiquidityBuffer, ConfigValue::Rate(buffer_bps)),
            (ConfigParam::Treasury, ConfigValue::Account(treasury.clone())),
            (ConfigParam::Custodian, ConfigValue::Account(custodian.clone())),
        ];
        for (param, value) in initial.iter() {
            timelock::validate(&env, *param, value)?;
        }
        if max_yield_change_bps as i128 > BPS_DENOMINATOR {
            return Err(VaultError::InvalidYieldBound);
        }

        let asset_decimals = token::Client::new(&env, &asset).decimals();
        let share_decimals = ShareLedgerClient::new(&env, &share_token).decimals();
        let scale = decimals_scale(asset_decimals, share_decimals)?;

        write_role_manager(&env, &roles);
        write_asset(&env, &asset);
        write_share_token(&env, &share_token);
        write_treasury(&env, &treasury);
        write_custodian(&env, &custodian);
        write_fee_bps(&env, fee_bps);
        write_cooldown(&env, cooldown);
        write_buffer_bps(&env, buffer_bps);
        write_max_yield_change_bps(&env, max_yield_change_bps);
        write_decimals_scale(&env, scale);
        extend_instance(&env);

        events::initialized(&env, &asset, &share_token, scale);
        Ok(())
    }

    /// Upgrade the contract WASM. Only callable by the owner.
    pub fn upgrade(env: Env, new_wasm_hash: BytesN<32>) {
        require_owner(&env);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    /// Bump instance TTL. Anyone may call this to keep the vault alive.
    pub fn bump_instance(env: Env) {
        extend_instance(&env);
    }

    // ==========================================================
    // Deposits and custody
    // ==========================================================

    /// Deposit `amount` of the base asset and receive shares priced
    /// before the deposit lands.
    pub fn deposit(env: Env, depositor: Address, amount: i128) -> Result<i128, VaultError> {
        depositor.require_auth();
        let _guard = ReentrancyGuard::acquire(&env)?;
        if amount <= 0 {
            return Err(VaultError::InvalidAmount);
        }
        require_open(&env, Flow::Deposit)?;
        extend_instance(&env);

        let before = Pricing::load(&env);
        let shares = before.assets_to_shares(&env, amount, Rounding::Down)?;
        if shares == 0 {
            return Err(VaultError::ZeroShares);
        }

        let asset = token::Client::new(&env, &storage::read_asset(&env));
        asset.transfer(&depositor, &env.current_contract_address(), &amount);
        record_deposit(&env, amount)?;
        ShareLedgerClient::new(&env, &read_share_token(&env)).mint(&depositor, &shares);

        let after = Pricing::load(&env);
        events::deposit(
            &env,
            &depositor,
            DepositEvent {
                assets: amount,
                shares,
                price_before: before.share_price(&env)?,
                price_after: after.share_price(&env)?,
                total_assets_before: before.total_assets,
                total_assets_after: after.total_assets,
            },
        );

        let forwarded = custody::forward_excess(&env)?;
        if forwarded > 0 {
            log!(&env, "forwarded to custodian", forwarded);
        }
        Ok(shares)
    }

    /// Custodian hands liquidity back to the vault.
    pub fn return_liquidity(env: Env, custodian: Address, amount: i128) -> Result<(), VaultError> {
        custodian.require_auth();
        let _guard = ReentrancyGuard::acquire(&env)?;
        extend_instance(&env);
        custody::return_liquidity(&env, &custodian, amount)
    }

    // ==========================================================
    // Withdrawal queue
    // ==========================================================

    /// Escrow `shares` and queue them for redemption. Returns the request id.
    pub fn request_withdrawal(
        env: Env,
        requester: Address,
        shares: i128,
    ) -> Result<u64, VaultError> {
        requester.require_auth();
        let _guard = ReentrancyGuard::acquire(&env)?;
        require_open(&env, Flow::Withdrawal)?;
        extend_instance(&env);

        let event = queue::enqueue(&env, &requester, shares)?;
        let id = event.id;
        events::withdrawal_requested(&env, &requester, event);
        Ok(id)
    }

    /// Settle up to `max_count` queue entries from the head.
    /// Returns `(requests paid, asset paid)`.
    pub fn fulfill_withdrawals(
        env: Env,
        operator: Address,
        max_count: u32,
    ) -> Result<(u32, i128), VaultError> {
        require_operator(&env, &operator)?;
        let _guard = ReentrancyGuard::acquire(&env)?;
        require_open(&env, Flow::Withdrawal)?;
        extend_instance(&env);

        let event = queue::fulfill(&env, max_count)?;
        let result = (event.processed, event.assets_paid);
        events::fulfilled(&env, event);
        Ok(result)
    }

    /// Give escrowed shares back to the requester.
    pub fn cancel_withdrawal(env: Env, caller: Address, id: u64) -> Result<(), VaultError> {
        caller.require_auth();
        let _guard = ReentrancyGuard::acquire(&env)?;
        extend_instance(&env);
        queue::cancel(&env, &caller, id)?;
        Ok(())
    }

    /// Owner-only: settle one request now, ignoring cooldown and order.
    /// Returns the asset paid.
    pub fn force_process_withdrawal(env: Env, id: u64) -> Result<i128, VaultError> {
        require_owner(&env);
        let _guard = ReentrancyGuard::acquire(&env)?;
        extend_instance(&env);
        let settlement = queue::force_process(&env, id)?;
        Ok(settlement.assets)
    }

    // ==========================================================
    // Yield and fees
    // ==========================================================

    /// Fold a signed yield `delta` into NAV and collect the fee on gains.
    /// Returns the fee shares minted to the treasury.
    pub fn report_yield(env: Env, operator: Address, delta: i128) -> Result<i128, VaultError> {
        require_operator(&env, &operator)?;
        let _guard = ReentrancyGuard::acquire(&env)?;
        require_open(&env, Flow::Reporting)?;
        extend_instance(&env);

        let event = fees::report_yield(&env, delta)?;
        let fee_shares = event.fee_shares;
        events::yield_reported(&env, event);
        Ok(fee_shares)
    }

    /// Owner-only: bound on `|delta|` per report as bps of NAV, 0 disables.
    pub fn set_max_yield_change(env: Env, bps: u32) -> Result<(), VaultError> {
        require_owner(&env);
        let _guard = ReentrancyGuard::acquire(&env)?;
        if bps as i128 > BPS_DENOMINATOR {
            return Err(VaultError::InvalidYieldBound);
        }
        extend_instance(&env);

        let old_bps = read_max_yield_change_bps(&env);
        write_max_yield_change_bps(&env, bps);
        events::yield_bound_changed(&env, old_bps, bps);
        Ok(())
    }

    // ==========================================================
    // Timelocked configuration
    // ==========================================================

    pub fn queue_config_change(
        env: Env,
        param: ConfigParam,
        value: ConfigValue,
    ) -> Result<PendingChange, VaultError> {
        require_owner(&env);
        let _guard = ReentrancyGuard::acquire(&env)?;
        extend_instance(&env);

        let change = timelock::queue(&env, param, value)?;
        events::config_queued(&env, param, change.clone());
        Ok(change)
    }

    pub fn execute_config_change(env: Env, param: ConfigParam) -> Result<(), VaultError> {
        require_owner(&env);
        let _guard = ReentrancyGuard::acquire(&env)?;
        extend_instance(&env);

        let (old_value, new_value) = timelock::execute(&env, param)?;
        events::config_executed(
            &env,
            param,
            ConfigAppliedEvent {
                old_value,
                new_value,
            },
        );
        Ok(())
    }

    pub fn cancel_config_change(env: Env, param: ConfigParam) -> Result<(), VaultError> {
        require_owner(&env);
        let _guard = ReentrancyGuard::acquire(&env)?;
        extend_instance(&env);

        let change = timelock::cancel(&env, param)?;
        events::config_cancelled(&env, param, change);
        Ok(())
    }

    pub fn pending_change(env: Env, param: ConfigParam) -> Option<PendingChange> {
        storage::read_pending_change(&env, param)
    }

    // ==========================================================
    // Views
    // ==========================================================

    /// Asset value of one whole share, `PRICE_SCALE` == 1.0.
    pub fn share_price(env: Env) -> Result<i128, VaultError> {
        Pricing::load(&env).share_price(&env)
    }

    pub fn total_assets(env: Env) -> i128 {
        nav::total_assets(&read_nav(&env))
    }

    pub fn total_shares(env: Env) -> i128 {
        ShareLedgerClient::new(&env, &read_share_token(&env)).total_supply()
    }

    /// Shares escrowed in live requests.
    pub fn pending_withdrawals(env: Env) -> i128 {
        read_pending_shares(&env)
    }

    pub fn get_withdrawal_request(env: Env, id: u64) -> Result<WithdrawalRequest, VaultError> {
        read_request(&env, id).ok_or(VaultError::RequestNotFound)
    }

    pub fn queue_head(env: Env) -> u64 {
        read_queue_head(&env)
    }

    pub fn queue_length(env: Env) -> u64 {
        read_queue_length(&env)
    }

    pub fn pending_requests_of(env: Env, holder: Address) -> u32 {
        read_pending_count(&env, &holder)
    }

    pub fn nav_state(env: Env) -> NavState {
        read_nav(&env)
    }

    pub fn last_yield_report(env: Env) -> Option<u64> {
        read_last_yield_report(&env)
    }

    pub fn fee_rate(env: Env) -> u32 {
        read_fee_bps(&env)
    }

    pub fn treasury(env: Env) -> Address {
        read_treasury(&env)
    }

    pub fn custodian(env: Env) -> Address {
        read_custodian(&env)
    }

    pub fn cooldown(env: Env) -> u64 {
        read_cooldown(&env)
    }

    pub fn liquidity_buffer(env: Env) -> u32 {
        read_buffer_bps(&env)
    }

    pub fn max_yield_change(env: Env) -> u32 {
        read_max_yield_change_bps(&env)
    }

    /// Base asset currently held by the vault.
    pub fn available_liquidity(env: Env) -> i128 {
        custody::available_liquidity(&env)
    }

    /// Shares `deposit(assets)` would mint right now.
    pub fn preview_deposit(env: Env, assets: i128) -> Result<i128, VaultError> {
        Pricing::load(&env).assets_to_shares(&env, assets, Rounding::Down)
    }

    /// Assets `shares` would be paid at the current price.
    pub fn preview_redeem(env: Env, shares: i128) -> Result<i128, VaultError> {
        Pricing::load(&env).shares_to_assets(&env, shares, Rounding::Down)
    }

    /// Shares needed to receive `assets`, rounded up.
    pub fn preview_withdraw(env: Env, assets: i128) -> Result<i128, VaultError> {
        Pricing::load(&env).assets_to_shares(&env, assets, Rounding::Up)
    }
}
