//! Append-only withdrawal log with share escrow.
//!
//! Requests live at stable ids `0..length`. Settled or cancelled entries
//! keep their slot with `shares == 0`. `head` only ever moves forward and
//! everything below it has been settled or cancelled.

use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::access::is_privileged;
use crate::error::VaultError;
use crate::events::{self, CancelEvent, FulfillEvent, RequestEvent, SettlementEvent};
use crate::interfaces::ShareLedgerClient;
use crate::math::Rounding;
use crate::nav::{record_withdrawal, total_assets, Pricing};
use crate::storage::{
    read_asset, read_cooldown, read_pending_count, read_pending_shares, read_queue_head,
    read_queue_length, read_request, read_share_token, write_pending_count,
    write_pending_shares, write_queue_head, write_queue_length, write_request,
};
use crate::types::WithdrawalRequest;

pub const MAX_PENDING_PER_HOLDER: u32 = 10;

/// How long a requester may take back their own request.
pub const CANCEL_GRACE_PERIOD: u64 = 3_600;

fn shares_client(env: &Env) -> ShareLedgerClient<'_> {
    ShareLedgerClient::new(env, &read_share_token(env))
}

fn live_request(env: &Env, id: u64) -> Result<WithdrawalRequest, VaultError> {
    let request = read_request(env, id).ok_or(VaultError::RequestNotFound)?;
    if !request.is_live() {
        return Err(VaultError::RequestNotPending);
    }
    Ok(request)
}

/// Escrow `shares` from `requester` and append a request for them.
pub fn enqueue(env: &Env, requester: &Address, shares: i128) -> Result<RequestEvent, VaultError> {
    if shares <= 0 {
        return Err(VaultError::InvalidAmount);
    }
    let ledger = shares_client(env);
    if ledger.balance(requester) < shares {
        return Err(VaultError::InsufficientShares);
    }
    let count = read_pending_count(env, requester);
    if count >= MAX_PENDING_PER_HOLDER {
        return Err(VaultError::TooManyPendingRequests);
    }

    let id = read_queue_length(env);
    write_request(
        env,
        id,
        &WithdrawalRequest {
            requester: requester.clone(),
            shares,
            requested_at: env.ledger().timestamp(),
        },
    );
    write_queue_length(env, id + 1);

    let pending_before = read_pending_shares(env);
    let pending_after = pending_before
        .checked_add(shares)
        .ok_or(VaultError::ArithmeticOverflow)?;
    write_pending_shares(env, pending_after);
    write_pending_count(env, requester, count + 1);

    ledger.transfer(requester, &env.current_contract_address(), &shares);
    assert_escrow_covered(env);

    Ok(RequestEvent {
        id,
        shares,
        pending_before,
        pending_after,
    })
}

/// Pay out requests in arrival order.
///
/// Stops at the first live request that is still cooling down or that
/// available liquidity cannot cover; neither is an error. `max_count`
/// bounds how many entries are examined, dead ones included.
pub fn fulfill(env: &Env, max_count: u32) -> Result<FulfillEvent, VaultError> {
    if max_count == 0 {
        return Err(VaultError::InvalidAmount);
    }

    let head_before = read_queue_head(env);
    let length = read_queue_length(env);
    let cooldown = read_cooldown(env);
    let now = env.ledger().timestamp();

    let mut pricing = Pricing::load(env);
    let mut liquidity =
        token::Client::new(env, &read_asset(env)).balance(&env.current_contract_address());

    let mut cursor = head_before;
    let mut examined = 0u32;
    let mut processed = 0u32;
    let mut assets_paid = 0i128;

    while cursor < length && examined < max_count {
        examined += 1;

        let request = match read_request(env, cursor) {
            Some(request) if request.is_live() => request,
            _ => {
                cursor += 1;
                continue;
            }
        };

        if now < request.requested_at.saturating_add(cooldown) {
            break;
        }
        let assets = pricing.shares_to_assets(env, request.shares, Rounding::Down)?;
        if assets > liquidity {
            break;
        }

        let settlement = settle(env, cursor, &request, assets, &pricing)?;
        events::withdrawal_settled(env, &request.requester, settlement);

        pricing = pricing.after_redeem(request.shares, assets);
        liquidity -= assets;
        assets_paid += assets;
        processed += 1;
        cursor += 1;
    }

    if cursor < head_before {
        panic_with_error!(env, VaultError::QueueRegression);
    }
    write_queue_head(env, cursor);
    assert_escrow_covered(env);

    Ok(FulfillEvent {
        processed,
        assets_paid,
        head_before,
        head_after: cursor,
    })
}

/// Settle one request out of order, ignoring its cooldown.
pub fn force_process(env: &Env, id: u64) -> Result<SettlementEvent, VaultError> {
    let request = live_request(env, id)?;
    let pricing = Pricing::load(env);
    let assets = pricing.shares_to_assets(env, request.shares, Rounding::Down)?;

    let liquidity =
        token::Client::new(env, &read_asset(env)).balance(&env.current_contract_address());
    if assets > liquidity {
        return Err(VaultError::InsufficientLiquidity);
    }

    let settlement = settle(env, id, &request, assets, &pricing)?;
    events::withdrawal_forced(env, &request.requester, settlement.clone());
    assert_escrow_covered(env);
    Ok(settlement)
}

/// Return escrowed shares to the requester.
///
/// The owner and operators may cancel any live request. The requester
/// may cancel their own within `CANCEL_GRACE_PERIOD` of creating it.
pub fn cancel(env: &Env, caller: &Address, id: u64) -> Result<WithdrawalRequest, VaultError> {
    let request = live_request(env, id)?;

    if !is_privileged(env, caller) {
        if *caller != request.requester {
            return Err(VaultError::Unauthorized);
        }
        let deadline = request.requested_at.saturating_add(CANCEL_GRACE_PERIOD);
        if env.ledger().timestamp() > deadline {
            return Err(VaultError::CancelWindowClosed);
        }
    }

    let pending_before = read_pending_shares(env);
    let holder_requests_before = read_pending_count(env, &request.requester);
    release_entry(env, id, &request);
    shares_client(env).transfer(
        &env.current_contract_address(),
        &request.requester,
        &request.shares,
    );
    assert_escrow_covered(env);

    events::withdrawal_cancelled(
        env,
        &request.requester,
        CancelEvent {
            id,
            shares: request.shares,
            pending_before,
            pending_after: read_pending_shares(env),
            holder_requests_before,
            holder_requests_after: read_pending_count(env, &request.requester),
        },
    );
    Ok(request)
}

/// Zero the entry and drop it from the pending totals.
fn release_entry(env: &Env, id: u64, request: &WithdrawalRequest) {
    write_request(
        env,
        id,
        &WithdrawalRequest {
            shares: 0,
            ..request.clone()
        },
    );

    let pending = read_pending_shares(env) - request.shares;
    if pending < 0 {
        panic_with_error!(env, VaultError::EscrowMismatch);
    }
    write_pending_shares(env, pending);

    let count = read_pending_count(env, &request.requester);
    write_pending_count(env, &request.requester, count.saturating_sub(1));
}

// All bookkeeping is written before the burn and the payout.
fn settle(
    env: &Env,
    id: u64,
    request: &WithdrawalRequest,
    assets: i128,
    pricing: &Pricing,
) -> Result<SettlementEvent, VaultError> {
    release_entry(env, id, request);
    let nav = record_withdrawal(env, assets)?;

    let vault = env.current_contract_address();
    shares_client(env).burn(&vault, &request.shares);
    if assets > 0 {
        token::Client::new(env, &read_asset(env)).transfer(&vault, &request.requester, &assets);
    }

    Ok(SettlementEvent {
        id,
        shares: request.shares,
        assets,
        total_assets_before: pricing.total_assets,
        total_assets_after: total_assets(&nav),
    })
}

/// Every share counted as pending must sit in the vault's own balance.
pub fn assert_escrow_covered(env: &Env) {
    let held = shares_client(env).balance(&env.current_contract_address());
    if held < read_pending_shares(env) {
        panic_with_error!(env, VaultError::EscrowMismatch);
    }
}
