use thiserror::Error;

use crate::model::DepositState;

/// Result type alias using DepositError
pub type Result<T> = std::result::Result<T, DepositError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code used in error output and in log events
/// (`err.code`). Kinds group into coarse categories via [`ExErrorKind::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    InvalidAddress,

    // State gates
    NothingToResume,
    StateNotAllowed,
    NoLiquidationStrategy,
    LotSizeNotPermitted,
    RedemptionInFlight,

    // Ledger / transport
    NotFound,
    DuplicateSubscription,
    EventStreamClosed,
    ExternalService,

    // Internal
    Internal,
}

/// Coarse grouping used by the top-level handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input caught before any ledger call
    Validation,
    /// The deposit's current state does not permit the requested flow
    StateGate,
    /// A ledger call, lookup or event wait failed
    Transport,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidAddress => "ERR_INVALID_ADDRESS",
            ExErrorKind::NothingToResume => "ERR_NOTHING_TO_RESUME",
            ExErrorKind::StateNotAllowed => "ERR_STATE_NOT_ALLOWED",
            ExErrorKind::NoLiquidationStrategy => "ERR_NO_LIQUIDATION_STRATEGY",
            ExErrorKind::LotSizeNotPermitted => "ERR_LOT_SIZE_NOT_PERMITTED",
            ExErrorKind::RedemptionInFlight => "ERR_REDEMPTION_IN_FLIGHT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::DuplicateSubscription => "ERR_DUPLICATE_SUBSCRIPTION",
            ExErrorKind::EventStreamClosed => "ERR_EVENT_STREAM_CLOSED",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ExErrorKind::InvalidInput | ExErrorKind::InvalidAddress => ErrorCategory::Validation,
            ExErrorKind::NothingToResume
            | ExErrorKind::StateNotAllowed
            | ExErrorKind::NoLiquidationStrategy
            | ExErrorKind::LotSizeNotPermitted
            | ExErrorKind::RedemptionInFlight => ErrorCategory::StateGate,
            ExErrorKind::NotFound
            | ExErrorKind::DuplicateSubscription
            | ExErrorKind::EventStreamClosed
            | ExErrorKind::ExternalService => ErrorCategory::Transport,
            ExErrorKind::Internal => ErrorCategory::Internal,
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus the deposit and state
/// context the failure was observed in.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    deposit: Option<String>,
    state: Option<DepositState>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            deposit: None,
            state: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add deposit address context
    pub fn with_deposit(mut self, deposit: impl Into<String>) -> Self {
        self.deposit = Some(deposit.into());
        self
    }

    /// Add the state the deposit was observed in
    pub fn with_state(mut self, state: DepositState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn deposit(&self) -> Option<&str> {
        self.deposit.as_deref()
    }

    pub fn state(&self) -> Option<DepositState> {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(deposit) = &self.deposit {
            write!(f, " (deposit: {})", deposit)?;
        }
        if let Some(state) = self.state {
            write!(f, " (state: {})", state)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Errors raised while executing a resolved deposit command
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DepositError {
    // ===== Validation =====
    #[error("Invalid address: {input}")]
    InvalidAddress { input: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // ===== State gates =====
    /// Resume was restricted to a phase the deposit is not in
    #[error("Nothing to resume: deposit {deposit} is in state {state}, {phase} phase is not resumable")]
    NothingToResume {
        deposit: String,
        state: DepositState,
        phase: &'static str,
    },

    /// An explicit liquidation reason does not apply to the current state
    #[error("Deposit {deposit} is not in a state that allows this liquidation reason ({reason}); current state is {state}")]
    StateNotAllowed {
        deposit: String,
        state: DepositState,
        reason: &'static str,
    },

    #[error("No possible liquidation strategy for deposit {deposit} in state {state}")]
    NoLiquidationStrategy {
        deposit: String,
        state: DepositState,
    },

    #[error("Lot size {lot_size} is not permitted, allowed lot sizes are {allowed:?}")]
    LotSizeNotPermitted { lot_size: u64, allowed: Vec<u64> },

    #[error("Deposit {deposit} already has a redemption in flight")]
    RedemptionInFlight { deposit: String },

    // ===== Ledger / transport =====
    #[error("Deposit not found: {deposit}")]
    DepositNotFound { deposit: String },

    /// A flow tried to wait on the same lifecycle event twice
    #[error("Already subscribed to {event} for this flow")]
    DuplicateSubscription { event: &'static str },

    /// The handle dropped a subscription without delivering its event
    #[error("Event stream closed before {event} was observed")]
    EventStreamClosed { event: &'static str },

    #[error("Ledger call {op} failed: {message}")]
    Transport { op: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<DepositError> for ExError {
    fn from(err: DepositError) -> Self {
        match err {
            DepositError::InvalidAddress { input } => ExError::new(ExErrorKind::InvalidAddress)
                .with_message(format!("Invalid address: {}", input)),

            DepositError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            DepositError::NothingToResume {
                deposit,
                state,
                phase,
            } => ExError::new(ExErrorKind::NothingToResume)
                .with_op("resume_deposit")
                .with_deposit(deposit)
                .with_state(state)
                .with_message(format!("nothing to resume in the {} phase", phase)),

            DepositError::StateNotAllowed {
                deposit,
                state,
                reason,
            } => ExError::new(ExErrorKind::StateNotAllowed)
                .with_op("liquidate_deposit")
                .with_deposit(deposit)
                .with_state(state)
                .with_message(format!(
                    "deposit is not in a state that allows this reason: {}",
                    reason
                )),

            DepositError::NoLiquidationStrategy { deposit, state } => {
                ExError::new(ExErrorKind::NoLiquidationStrategy)
                    .with_op("liquidate_deposit")
                    .with_deposit(deposit)
                    .with_state(state)
                    .with_message("no possible liquidation strategy")
            }

            DepositError::LotSizeNotPermitted { lot_size, allowed } => {
                ExError::new(ExErrorKind::LotSizeNotPermitted)
                    .with_op("new_deposit")
                    .with_message(format!(
                        "lot size {} is not one of {:?}",
                        lot_size, allowed
                    ))
            }

            DepositError::RedemptionInFlight { deposit } => {
                ExError::new(ExErrorKind::RedemptionInFlight)
                    .with_op("redeem_deposit")
                    .with_deposit(deposit)
                    .with_message("a redemption is already in flight")
            }

            DepositError::DepositNotFound { deposit } => ExError::new(ExErrorKind::NotFound)
                .with_deposit(deposit)
                .with_message("Deposit not found"),

            DepositError::DuplicateSubscription { event } => {
                ExError::new(ExErrorKind::DuplicateSubscription)
                    .with_message(format!("duplicate subscription to {}", event))
            }

            DepositError::EventStreamClosed { event } => {
                ExError::new(ExErrorKind::EventStreamClosed)
                    .with_message(format!("event stream closed waiting for {}", event))
            }

            DepositError::Transport { op, message } => ExError::new(ExErrorKind::ExternalService)
                .with_op(op)
                .with_message(message),

            DepositError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl DepositError {
    /// Shorthand for a failed ledger call
    pub fn transport(op: impl Into<String>, message: impl Into<String>) -> Self {
        DepositError::Transport {
            op: op.into(),
            message: message.into(),
        }
    }
}
