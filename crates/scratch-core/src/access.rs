use serde::{Deserialize, Serialize};

use crate::error::ModuleError;
use crate::types::Address;

/// Single-administrator access control.
///
/// Transfer of control is one immediate call with no accept step. The only
/// optional safeguard is refusing the zero address when `harden` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    administrator: Address,
    harden: bool,
}

impl AccessControl {
    /// The initial administrator must not be the zero address.
    pub fn new(administrator: Address) -> Result<Self, ModuleError> {
        if administrator.is_zero() {
            return Err(ModuleError::InvalidAdministrator);
        }
        Ok(Self {
            administrator,
            harden: false,
        })
    }

    /// Reject zero-address transfers instead of accepting them.
    pub fn hardened(mut self, harden: bool) -> Self {
        self.harden = harden;
        self
    }

    pub fn administrator(&self) -> Address {
        self.administrator
    }

    pub fn is_hardened(&self) -> bool {
        self.harden
    }

    pub fn is_administrator(&self, caller: &Address) -> bool {
        self.administrator == *caller
    }

    pub fn ensure_administrator(&self, caller: &Address) -> Result<(), ModuleError> {
        if !self.is_administrator(caller) {
            return Err(ModuleError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Hand control to `new_admin`. Returns the previous administrator.
    pub fn transfer(
        &mut self,
        caller: &Address,
        new_admin: Address,
    ) -> Result<Address, ModuleError> {
        self.ensure_administrator(caller)?;
        if self.harden && new_admin.is_zero() {
            return Err(ModuleError::InvalidAdministrator);
        }
        let previous = self.administrator;
        self.administrator = new_admin;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Address {
        Address::derive(b"admin", "test")
    }

    fn other() -> Address {
        Address::derive(b"other", "test")
    }

    #[test]
    fn test_new_rejects_zero() {
        assert_eq!(
            AccessControl::new(Address::ZERO),
            Err(ModuleError::InvalidAdministrator)
        );
    }

    #[test]
    fn test_ensure_administrator() {
        let ac = AccessControl::new(admin()).unwrap();
        assert!(ac.ensure_administrator(&admin()).is_ok());
        assert_eq!(
            ac.ensure_administrator(&other()),
            Err(ModuleError::Unauthorized { caller: other() })
        );
    }

    #[test]
    fn test_transfer_by_admin() {
        let mut ac = AccessControl::new(admin()).unwrap();
        let previous = ac.transfer(&admin(), other()).unwrap();
        assert_eq!(previous, admin());
        assert_eq!(ac.administrator(), other());
        // The old administrator has lost control immediately.
        assert!(ac.ensure_administrator(&admin()).is_err());
    }

    #[test]
    fn test_transfer_by_non_admin_leaves_state() {
        let mut ac = AccessControl::new(admin()).unwrap();
        let result = ac.transfer(&other(), other());
        assert!(matches!(result, Err(ModuleError::Unauthorized { .. })));
        assert_eq!(ac.administrator(), admin());
    }

    #[test]
    fn test_transfer_to_zero_allowed_when_not_hardened() {
        let mut ac = AccessControl::new(admin()).unwrap();
        ac.transfer(&admin(), Address::ZERO).unwrap();
        assert!(ac.administrator().is_zero());
    }

    #[test]
    fn test_transfer_to_zero_rejected_when_hardened() {
        let mut ac = AccessControl::new(admin()).unwrap().hardened(true);
        let result = ac.transfer(&admin(), Address::ZERO);
        assert_eq!(result, Err(ModuleError::InvalidAdministrator));
        assert_eq!(ac.administrator(), admin());
    }
}
