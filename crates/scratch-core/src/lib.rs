pub mod access;
pub mod config;
pub mod error;
pub mod event;
pub mod fee;
pub mod types;
pub mod units;

pub use access::AccessControl;
pub use config::{ChainConfig, ModuleConfig};
pub use error::{ModuleError, TransferError};
pub use event::{AdministratorTransferred, FeeRateUpdated, ModuleEvent, PaymentSent};
pub use fee::{FeePolicy, FeeQuote};
pub use types::{Address, BasisPoints, ChainId, Wei, BPS_DENOMINATOR, ETHER, MAX_FEE_RATE};
pub use units::{format_ether, parse_ether, UnitsError};
