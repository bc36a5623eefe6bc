//! Access tiers and permissions.
//!
//! PlugOn has six fixed roles, from the platform operator (`super_admin`) down
//! to ordinary shoppers (`customer`). The organisational tiers in between
//! (`headquarters` > `branch` > `district` > `salesPoint`) manage the tiers
//! below them.
//!
//! Roles arrive from persisted sessions and remote APIs as plain strings. A
//! value outside the six known names is kept as [`Role::Unknown`] so it
//! round-trips unchanged, but it carries no permissions and never satisfies a
//! role check.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's access tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Platform operator. Holds every permission.
    SuperAdmin,
    /// Company headquarters staff.
    Headquarters,
    /// Regional branch staff.
    Branch,
    /// District office staff.
    District,
    /// Sales point staff.
    SalesPoint,
    /// Ordinary shop customer.
    Customer,
    /// A role name this build does not recognise.
    Unknown(String),
}

impl Role {
    /// Every known role, highest tier first.
    pub const KNOWN: [Self; 6] = [
        Self::SuperAdmin,
        Self::Headquarters,
        Self::Branch,
        Self::District,
        Self::SalesPoint,
        Self::Customer,
    ];

    /// The wire name of this role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Headquarters => "headquarters",
            Self::Branch => "branch",
            Self::District => "district",
            Self::SalesPoint => "salesPoint",
            Self::Customer => "customer",
            Self::Unknown(raw) => raw,
        }
    }

    /// Korean label shown next to the user's name.
    ///
    /// Unknown roles display their raw name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::SuperAdmin => "최고관리자",
            Self::Headquarters => "본사",
            Self::Branch => "지사",
            Self::District => "지점",
            Self::SalesPoint => "영업점",
            Self::Customer => "일반회원",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether this is one of the six known roles.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Staff roles that may use the task schedule.
    #[must_use]
    pub const fn has_task_access(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Headquarters | Self::Branch)
    }

    /// Staff roles that may use the `MyStore` back office.
    #[must_use]
    pub const fn has_admin_access(&self) -> bool {
        matches!(
            self,
            Self::SuperAdmin | Self::Headquarters | Self::Branch | Self::District | Self::SalesPoint
        )
    }

    /// Permissions granted explicitly to this role.
    ///
    /// `super_admin` returns an empty slice here; it is granted everything by
    /// [`Role::has_permission`] instead of by enumeration.
    #[must_use]
    pub const fn permissions(&self) -> &'static [Permission] {
        use Permission::{
            ManageBranch, ManageDistrict, ManageProducts, ManageSalesPoint, Shop, ViewProducts,
            ViewTasks,
        };

        match self {
            Self::Headquarters => &[
                ManageBranch,
                ManageDistrict,
                ManageSalesPoint,
                ViewTasks,
                ManageProducts,
            ],
            Self::Branch => &[ManageDistrict, ManageSalesPoint, ViewTasks, ManageProducts],
            Self::District => &[ManageSalesPoint, ManageProducts],
            Self::SalesPoint => &[ManageProducts],
            Self::Customer => &[ViewProducts, Shop],
            Self::SuperAdmin | Self::Unknown(_) => &[],
        }
    }

    /// Whether this role holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        matches!(self, Self::SuperAdmin) || self.permissions().contains(&permission)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "super_admin" => Self::SuperAdmin,
            "headquarters" => Self::Headquarters,
            "branch" => Self::Branch,
            "district" => Self::District,
            "salesPoint" => Self::SalesPoint,
            "customer" => Self::Customer,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Unknown(_) => Self::Unknown(s),
            known => known,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

/// A set of roles that a role check can be made against.
///
/// Implemented for a single [`Role`] and for slices, arrays and vectors of
/// roles, so callers can write `has_role(Role::Branch)` or
/// `has_role([Role::Branch, Role::District])`.
pub trait RoleSet {
    /// Whether `role` is a member of this set.
    fn contains_role(&self, role: &Role) -> bool;
}

impl RoleSet for Role {
    fn contains_role(&self, role: &Role) -> bool {
        self == role
    }
}

impl RoleSet for &Role {
    fn contains_role(&self, role: &Role) -> bool {
        *self == role
    }
}

impl RoleSet for [Role] {
    fn contains_role(&self, role: &Role) -> bool {
        self.contains(role)
    }
}

impl RoleSet for &[Role] {
    fn contains_role(&self, role: &Role) -> bool {
        self.contains(role)
    }
}

impl<const N: usize> RoleSet for [Role; N] {
    fn contains_role(&self, role: &Role) -> bool {
        self.contains(role)
    }
}

impl RoleSet for Vec<Role> {
    fn contains_role(&self, role: &Role) -> bool {
        self.contains(role)
    }
}

/// Named capabilities checked by page glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageBranch,
    ManageDistrict,
    ManageSalesPoint,
    ViewTasks,
    ManageProducts,
    ViewProducts,
    Shop,
}

impl Permission {
    /// The wire name of this permission.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageBranch => "manage_branch",
            Self::ManageDistrict => "manage_district",
            Self::ManageSalesPoint => "manage_sales_point",
            Self::ViewTasks => "view_tasks",
            Self::ManageProducts => "manage_products",
            Self::ViewProducts => "view_products",
            Self::Shop => "shop",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manage_branch" => Ok(Self::ManageBranch),
            "manage_district" => Ok(Self::ManageDistrict),
            "manage_sales_point" => Ok(Self::ManageSalesPoint),
            "view_tasks" => Ok(Self::ViewTasks),
            "manage_products" => Ok(Self::ManageProducts),
            "view_products" => Ok(Self::ViewProducts),
            "shop" => Ok(Self::Shop),
            _ => Err(format!("invalid permission: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names_roundtrip() {
        for role in Role::KNOWN {
            let json = serde_json::to_string(&role).unwrap();
            let parsed: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, role);
        }
        assert_eq!(
            serde_json::to_string(&Role::SalesPoint).unwrap(),
            "\"salesPoint\""
        );
    }

    #[test]
    fn test_unknown_role_preserved() {
        let role: Role = serde_json::from_str("\"regional_manager\"").unwrap();
        assert_eq!(role, Role::Unknown("regional_manager".to_string()));
        assert!(!role.is_known());
        assert_eq!(
            serde_json::to_string(&role).unwrap(),
            "\"regional_manager\""
        );
    }

    #[test]
    fn test_unknown_role_has_no_permissions() {
        let role = Role::Unknown("guest".to_string());
        assert!(role.permissions().is_empty());
        assert!(!role.has_permission(Permission::Shop));
        assert!(!role.has_task_access());
        assert!(!role.has_admin_access());
    }

    #[test]
    fn test_super_admin_has_everything() {
        assert!(Role::SuperAdmin.has_permission(Permission::ManageBranch));
        assert!(Role::SuperAdmin.has_permission(Permission::Shop));
        assert!(Role::SuperAdmin.has_permission(Permission::ViewProducts));
    }

    #[test]
    fn test_permission_table() {
        assert!(Role::Headquarters.has_permission(Permission::ManageBranch));
        assert!(!Role::Branch.has_permission(Permission::ManageBranch));
        assert!(Role::Branch.has_permission(Permission::ViewTasks));
        assert!(!Role::District.has_permission(Permission::ViewTasks));
        assert!(Role::SalesPoint.has_permission(Permission::ManageProducts));
        assert!(!Role::SalesPoint.has_permission(Permission::ManageSalesPoint));
        assert!(Role::Customer.has_permission(Permission::Shop));
        assert!(!Role::Customer.has_permission(Permission::ManageProducts));
    }

    #[test]
    fn test_access_tiers() {
        assert!(!Role::District.has_task_access());
        assert!(Role::District.has_admin_access());
        assert!(!Role::Customer.has_task_access());
        assert!(!Role::Customer.has_admin_access());
        assert!(Role::Branch.has_task_access());
    }

    #[test]
    fn test_role_set() {
        assert!([Role::Branch, Role::District].contains_role(&Role::District));
        assert!(!Role::Customer.contains_role(&Role::Branch));
        assert!(vec![Role::Customer].contains_role(&Role::Customer));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Role::SuperAdmin.display_name(), "최고관리자");
        assert_eq!(Role::SalesPoint.display_name(), "영업점");
        assert_eq!(Role::Unknown("x".to_string()).display_name(), "x");
    }

    #[test]
    fn test_permission_from_str() {
        assert_eq!(
            "manage_sales_point".parse::<Permission>().unwrap(),
            Permission::ManageSalesPoint
        );
        assert!("all".parse::<Permission>().is_err());
    }
}
