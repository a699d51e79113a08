//! Role and status enums.

use serde::{Deserialize, Serialize};

/// Account role issued by the backend.
///
/// Serialized in SCREAMING_SNAKE_CASE on the wire (`"USER"`, `"VENDOR"`,
/// `"ADMIN"`), matching the backend's role claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular customer account.
    #[default]
    User,
    /// Vendor operating one or more shops.
    Vendor,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Whether this role may access vendor-scoped resources.
    ///
    /// Admins can see everything a vendor can.
    #[must_use]
    pub const fn is_vendor(&self) -> bool {
        matches!(self, Self::Vendor | Self::Admin)
    }

    /// Whether this role is a platform administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Order lifecycle status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_wire_format() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"VENDOR\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_capabilities() {
        assert!(!Role::User.is_vendor());
        assert!(Role::Vendor.is_vendor());
        assert!(Role::Admin.is_vendor());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Vendor.is_admin());
    }

    #[test]
    fn test_order_status_serde() {
        let status: OrderStatus = serde_json::from_str("\"SHIPPED\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
    }
}
