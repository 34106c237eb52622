//! Platform fee policy.
//!
//! The fee is `floor(gross * rate / 10000)`; the recipient receives the
//! remainder, so rounding always favors the recipient. The product is taken
//! in 256-bit arithmetic so any `u128` amount is safe at any allowed rate.

use ruint::aliases::U256;
use serde::{Deserialize, Serialize};

use crate::error::ModuleError;
use crate::types::{BasisPoints, Wei, BPS_DENOMINATOR, MAX_FEE_RATE};

/// Fee/net split of a gross amount at a given rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    /// Amount attached by the sender.
    pub gross: Wei,
    /// Platform fee routed to the administrator.
    pub fee: Wei,
    /// Amount forwarded to the recipient.
    pub net: Wei,
    /// Rate the split was computed at.
    pub fee_rate: BasisPoints,
}

/// Holds the current fee rate and enforces its bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    rate: BasisPoints,
}

impl FeePolicy {
    /// Create a policy, rejecting rates above [`MAX_FEE_RATE`].
    pub fn new(rate: BasisPoints) -> Result<Self, ModuleError> {
        Self::check_bound(rate)?;
        Ok(Self { rate })
    }

    pub fn rate(&self) -> BasisPoints {
        self.rate
    }

    pub fn max_rate(&self) -> BasisPoints {
        MAX_FEE_RATE
    }

    /// Replace the rate. Authorization is the caller's concern.
    pub fn set_rate(&mut self, rate: BasisPoints) -> Result<BasisPoints, ModuleError> {
        Self::check_bound(rate)?;
        let previous = self.rate;
        self.rate = rate;
        Ok(previous)
    }

    /// Split `gross` at the current rate.
    pub fn quote(&self, gross: Wei) -> Result<FeeQuote, ModuleError> {
        split(gross, self.rate)
    }

    fn check_bound(rate: BasisPoints) -> Result<(), ModuleError> {
        if rate > MAX_FEE_RATE {
            return Err(ModuleError::FeeTooHigh {
                requested: rate,
                max: MAX_FEE_RATE,
            });
        }
        Ok(())
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            rate: BasisPoints::ZERO,
        }
    }
}

/// Compute `(fee, net)` for `gross` at `rate`.
pub fn split(gross: Wei, rate: BasisPoints) -> Result<FeeQuote, ModuleError> {
    let product = U256::from(gross)
        .checked_mul(U256::from(rate.value()))
        .ok_or(ModuleError::ArithmeticOverflow)?;
    let fee_wide = product
        .checked_div(U256::from(BPS_DENOMINATOR))
        .ok_or(ModuleError::ArithmeticOverflow)?;
    let fee = u128::try_from(fee_wide).map_err(|_| ModuleError::ArithmeticOverflow)?;
    let net = gross
        .checked_sub(fee)
        .ok_or(ModuleError::ArithmeticOverflow)?;
    Ok(FeeQuote {
        gross,
        fee,
        net,
        fee_rate: rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ETHER;

    #[test]
    fn test_default_rate_is_zero() {
        assert_eq!(FeePolicy::default().rate(), BasisPoints::ZERO);
    }

    #[test]
    fn test_new_rejects_rate_above_max() {
        let result = FeePolicy::new(BasisPoints(1001));
        assert!(matches!(result, Err(ModuleError::FeeTooHigh { .. })));
    }

    #[test]
    fn test_set_rate_at_bound() {
        let mut policy = FeePolicy::default();
        let previous = policy.set_rate(BasisPoints(1000)).unwrap();
        assert_eq!(previous, BasisPoints::ZERO);
        assert_eq!(policy.rate(), BasisPoints(1000));
    }

    #[test]
    fn test_set_rate_above_bound_leaves_rate() {
        let mut policy = FeePolicy::new(BasisPoints(250)).unwrap();
        let result = policy.set_rate(BasisPoints(1001));
        assert_eq!(
            result,
            Err(ModuleError::FeeTooHigh {
                requested: BasisPoints(1001),
                max: BasisPoints(1000),
            })
        );
        assert_eq!(policy.rate(), BasisPoints(250));
    }

    #[test]
    fn test_five_percent_of_one_ether() {
        let q = split(ETHER, BasisPoints(500)).unwrap();
        assert_eq!(q.fee, ETHER / 20);
        assert_eq!(q.net, ETHER - ETHER / 20);
    }

    #[test]
    fn test_zero_rate_passes_everything_through() {
        let q = split(ETHER / 100, BasisPoints::ZERO).unwrap();
        assert_eq!(q.fee, 0);
        assert_eq!(q.net, ETHER / 100);
    }

    #[test]
    fn test_fee_rounds_down() {
        // 199 * 500 / 10000 = 9.95 -> 9
        let q = split(199, BasisPoints(500)).unwrap();
        assert_eq!(q.fee, 9);
        assert_eq!(q.net, 190);

        // Too small to carry any fee at all.
        let q = split(19, BasisPoints(500)).unwrap();
        assert_eq!(q.fee, 0);
        assert_eq!(q.net, 19);
    }

    #[test]
    fn test_split_conserves_value_across_rates() {
        let amounts = [1u128, 7, 9_999, 10_000, 123_456_789, ETHER, 3 * ETHER + 17];
        for rate in (0..=1000u16).step_by(37) {
            for &amount in &amounts {
                let q = split(amount, BasisPoints(rate)).unwrap();
                assert_eq!(q.fee + q.net, amount);
                assert_eq!(q.fee, amount * rate as u128 / 10_000);
            }
        }
    }

    #[test]
    fn test_split_max_u128_does_not_overflow() {
        let q = split(u128::MAX, MAX_FEE_RATE).unwrap();
        assert_eq!(q.fee, u128::MAX / 10);
        assert_eq!(q.fee + q.net, u128::MAX);
    }

    #[test]
    fn test_quote_uses_current_rate() {
        let policy = FeePolicy::new(BasisPoints(100)).unwrap();
        let q = policy.quote(10_000).unwrap();
        assert_eq!(q.fee, 100);
        assert_eq!(q.fee_rate, BasisPoints(100));
    }
}
