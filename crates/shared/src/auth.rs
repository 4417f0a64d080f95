//! Authentication claims carried by access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// `center` is `None` for platform administrators, who are not scoped to a
/// single educational center. Every other caller is bound to exactly one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Center ID the caller is scoped to, if any.
    pub center: Option<Uuid>,
    /// The caller's role.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a caller.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        center_id: Option<Uuid>,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            center: center_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the center ID the caller is scoped to, if any.
    #[must_use]
    pub const fn center_id(&self) -> Option<Uuid> {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_scoped_caller() {
        let user = Uuid::new_v4();
        let center = Uuid::new_v4();
        let claims = Claims::new(user, Some(center), "manager", Utc::now() + Duration::hours(1));

        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.center_id(), Some(center));
        assert_eq!(claims.role, "manager");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_platform_admin_has_no_center() {
        let claims = Claims::new(Uuid::new_v4(), None, "admin", Utc::now() + Duration::hours(1));
        assert_eq!(claims.center_id(), None);
    }
}
