//! Caller identity and ownership checks

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Account role stored on every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Seller,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = dalali_common::DalaliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" | "buyer" => Ok(Role::Customer),
            "seller" => Ok(Role::Seller),
            "admin" => Ok(Role::Admin),
            other => Err(dalali_common::DalaliError::InvalidRole(other.to_string())),
        }
    }
}

/// Anything with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Sellers and admins may publish listings.
    pub fn can_sell(&self) -> bool {
        matches!(self.role, Role::Seller | Role::Admin)
    }

    pub fn owns<T: Owned + ?Sized>(&self, resource: &T) -> bool {
        resource.owner_id() == self.user_id
    }

    /// Owner or admin.
    pub fn can_manage<T: Owned + ?Sized>(&self, resource: &T) -> bool {
        self.is_admin() || self.owns(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Listing(Uuid);

    impl Owned for Listing {
        fn owner_id(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn test_owner_and_admin_can_manage() {
        let owner = Actor::new(Uuid::new_v4(), Role::Seller);
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let stranger = Actor::new(Uuid::new_v4(), Role::Seller);
        let listing = Listing(owner.user_id);

        assert!(owner.can_manage(&listing));
        assert!(admin.can_manage(&listing));
        assert!(!admin.owns(&listing));
        assert!(!stranger.can_manage(&listing));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Seller".parse::<Role>().unwrap(), Role::Seller);
        assert_eq!("buyer".parse::<Role>().unwrap(), Role::Customer);
        assert!("landlord".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_can_sell() {
        assert!(Actor::new(Uuid::new_v4(), Role::Seller).can_sell());
        assert!(Actor::new(Uuid::new_v4(), Role::Admin).can_sell());
        assert!(!Actor::new(Uuid::new_v4(), Role::Customer).can_sell());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"customer\"");
    }
}
