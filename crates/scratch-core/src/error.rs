use crate::types::{Address, BasisPoints, Wei};

/// Errors surfaced by the settlement module's entry points.
///
/// Every variant aborts the whole operation: no state is mutated, no funds
/// move, and no event is emitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("caller {caller} is not the administrator")]
    Unauthorized { caller: Address },

    #[error("fee rate {requested} exceeds maximum {max}")]
    FeeTooHigh {
        requested: BasisPoints,
        max: BasisPoints,
    },

    #[error("payment must be greater than 0")]
    ZeroPayment,

    #[error("invalid recipient")]
    InvalidRecipient,

    #[error("cannot pay yourself")]
    SelfPayment,

    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("arithmetic overflow in fee computation")]
    ArithmeticOverflow,

    #[error("reentrant call rejected")]
    Reentrancy,

    #[error("administrator must not be the zero address")]
    InvalidAdministrator,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ModuleError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::FeeTooHigh { .. } => "FEE_TOO_HIGH",
            Self::ZeroPayment => "ZERO_PAYMENT",
            Self::InvalidRecipient => "INVALID_RECIPIENT",
            Self::SelfPayment => "SELF_PAYMENT",
            Self::TransferFailed(_) => "TRANSFER_FAILED",
            Self::ArithmeticOverflow => "ARITHMETIC_OVERFLOW",
            Self::Reentrancy => "REENTRANCY",
            Self::InvalidAdministrator => "INVALID_ADMINISTRATOR",
            Self::InvalidAddress(_) => "INVALID_ADDRESS",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Reasons the execution environment refused to move funds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("account {account} rejected funds: {reason}")]
    Rejected { account: Address, reason: String },

    #[error("insufficient funds in {account}: available {available}, required {required}")]
    InsufficientFunds {
        account: Address,
        available: Wei,
        required: Wei,
    },

    #[error("balance overflow crediting {account}")]
    BalanceOverflow { account: Address },

    #[error("direct deposits are not accepted; use send_payment")]
    DirectDepositRejected,
}
