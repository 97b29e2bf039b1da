use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    AlreadyInitialized = 1,

    NotInitialized = 2,

    // ---- input validation ----
    InvalidAmount = 10,

    InvalidAddress = 11,

    InvalidFeeRate = 12,

    InvalidCooldown = 13,

    InvalidBufferRate = 14,

    InvalidYieldBound = 15,

    InvalidDecimals = 16,

    // Timelock value of the wrong kind for the parameter
    InvalidConfigValue = 17,

    // ---- authorization / pause ----
    Unauthorized = 20,

    Paused = 21,

    DepositsPaused = 22,

    WithdrawalsPaused = 23,

    // ---- insufficiency ----
    InsufficientShares = 30,

    InsufficientLiquidity = 31,

    TooManyPendingRequests = 32,

    ZeroShares = 33,

    // Shares outstanding but nothing backing them
    ZeroNav = 34,

    // ---- queue lookups ----
    RequestNotFound = 40,

    RequestNotPending = 41,

    CancelWindowClosed = 42,

    // ---- temporal ----
    TimelockNotExpired = 50,

    NoPendingChange = 51,

    ChangeAlreadyQueued = 52,

    ReportTooSoon = 53,

    YieldChangeTooLarge = 54,

    Reentrancy = 60,

    // ---- invariant violations, unreachable unless the accounting is wrong ----
    ArithmeticOverflow = 70,

    EscrowMismatch = 71,

    QueueRegression = 72,

    FeeExceedsProfit = 73,
}
