//! Tenant scoping.
//!
//! Every financial operation receives the caller's resolved scope as an
//! explicit parameter rather than reaching into ambient request state.

use uuid::Uuid;

use super::error::BillingError;

/// The set of centers a caller may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Platform administrator; may act on any center.
    Unrestricted,
    /// Caller bound to a single center.
    Center(Uuid),
}

impl TenantScope {
    /// Builds a scope from an optional center id (as carried in auth claims).
    #[must_use]
    pub const fn from_center(center_id: Option<Uuid>) -> Self {
        match center_id {
            Some(id) => Self::Center(id),
            None => Self::Unrestricted,
        }
    }

    /// Whether the scope covers the given center.
    #[must_use]
    pub fn permits(&self, center_id: Uuid) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Center(own) => *own == center_id,
        }
    }

    /// Fails with `CenterMismatch` unless the scope covers the given center.
    pub fn authorize(&self, center_id: Uuid) -> Result<(), BillingError> {
        if self.permits(center_id) {
            Ok(())
        } else {
            Err(BillingError::CenterMismatch(center_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_permits_any_center() {
        let scope = TenantScope::Unrestricted;
        assert!(scope.permits(Uuid::new_v4()));
        assert!(scope.authorize(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_scoped_permits_own_center_only() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let scope = TenantScope::Center(own);

        assert!(scope.permits(own));
        assert!(!scope.permits(other));
        assert_eq!(
            scope.authorize(other),
            Err(BillingError::CenterMismatch(other))
        );
    }

    #[test]
    fn test_from_center() {
        assert_eq!(TenantScope::from_center(None), TenantScope::Unrestricted);

        let id = Uuid::new_v4();
        assert_eq!(TenantScope::from_center(Some(id)), TenantScope::Center(id));
    }
}
