use soroban_sdk::{contracttype, Address};

/// One entry of the append-only withdrawal log.
///
/// Entries are never removed. Fulfilment and cancellation zero `shares`
/// in place so request ids stay stable and the cursor stays meaningful.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalRequest {
    pub requester: Address,

    // Escrowed share units; zero once the request is settled or cancelled
    pub shares: i128,

    pub requested_at: u64,
}

impl WithdrawalRequest {
    pub fn is_live(&self) -> bool {
        self.shares != 0
    }
}

/// Cumulative counters the vault's NAV is derived from.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NavState {
    pub cumulative_deposited: i128,
    pub cumulative_withdrawn: i128,
    // Signed: losses are reported as negative deltas
    pub accumulated_yield: i128,
}

/// Parameters that can only change through the timelock.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigParam {
    FeeRate,
    Treasury,
    Custodian,
    Cooldown,
    LiquidityBuffer,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigValue {
    // basis points
    Rate(u32),
    Account(Address),
    Seconds(u64),
}

/// A queued parameter change. Its presence in storage is the `Queued`
/// state; there is no way to hold a timestamp without a value.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingChange {
    pub value: ConfigValue,
    pub eligible_at: u64,
}
