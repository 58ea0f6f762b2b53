//! Permission Definitions
//!
//! Declarative capability table: each permission lists the roles that hold it.
//! Route modules only name a permission; which roles pass is decided here.
//!
//! - Read (GET) routes only need a login, except reports
//! - Write routes are granted per module
//! - User management is admin only

use shared::models::Role;

pub const USERS_MANAGE: &str = "users:manage";
pub const CUSTOMERS_MANAGE: &str = "customers:manage";
pub const MEMBERSHIPS_MANAGE: &str = "memberships:manage";
pub const ATTENDANCE_MANAGE: &str = "attendance:manage";
pub const PRODUCTS_MANAGE: &str = "products:manage";
pub const ORDERS_MANAGE: &str = "orders:manage";
pub const BILLING_MANAGE: &str = "billing:manage";
pub const ACTIVITIES_MANAGE: &str = "activities:manage";
pub const ENROLLMENTS_MANAGE: &str = "enrollments:manage";
pub const REPORTS_VIEW: &str = "reports:view";

const ADMIN: &[Role] = &[Role::Admin];
const FRONT_DESK: &[Role] = &[Role::Admin, Role::Staff];
const FLOOR: &[Role] = &[Role::Admin, Role::Staff, Role::Trainer];

/// Permission → roles allowed to use it
pub const CAPABILITIES: &[(&str, &[Role])] = &[
    (USERS_MANAGE, ADMIN),
    (CUSTOMERS_MANAGE, FRONT_DESK),
    (MEMBERSHIPS_MANAGE, FRONT_DESK),
    (ATTENDANCE_MANAGE, FLOOR),
    (PRODUCTS_MANAGE, FRONT_DESK),
    (ORDERS_MANAGE, FRONT_DESK),
    (BILLING_MANAGE, FRONT_DESK),
    (ACTIVITIES_MANAGE, FRONT_DESK),
    (ENROLLMENTS_MANAGE, FLOOR),
    (REPORTS_VIEW, FRONT_DESK),
];

/// Roles allowed to use `permission`; unknown permissions are held by nobody
pub fn allowed_roles(permission: &str) -> &'static [Role] {
    CAPABILITIES
        .iter()
        .find(|(p, _)| *p == permission)
        .map(|(_, roles)| *roles)
        .unwrap_or(&[])
}

pub fn role_has_permission(role: Role, permission: &str) -> bool {
    allowed_roles(permission).contains(&role)
}

/// All permissions held by a role (returned on login for the UI)
pub fn permissions_for(role: Role) -> Vec<&'static str> {
    CAPABILITIES
        .iter()
        .filter(|(_, roles)| roles.contains(&role))
        .map(|(p, _)| *p)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_holds_every_permission() {
        for (permission, _) in CAPABILITIES {
            assert!(role_has_permission(Role::Admin, permission), "{permission}");
        }
    }

    #[test]
    fn test_user_management_is_admin_only() {
        assert!(!role_has_permission(Role::Staff, USERS_MANAGE));
        assert!(!role_has_permission(Role::Trainer, USERS_MANAGE));
    }

    #[test]
    fn test_trainer_runs_classes_only() {
        assert!(role_has_permission(Role::Trainer, ENROLLMENTS_MANAGE));
        assert!(role_has_permission(Role::Trainer, ATTENDANCE_MANAGE));
        assert!(!role_has_permission(Role::Trainer, ORDERS_MANAGE));
        assert!(!role_has_permission(Role::Trainer, PRODUCTS_MANAGE));
        assert!(!role_has_permission(Role::Trainer, REPORTS_VIEW));
    }

    #[test]
    fn test_unknown_permission_denied() {
        assert!(allowed_roles("nuclear:launch").is_empty());
        assert!(!role_has_permission(Role::Admin, "nuclear:launch"));
    }

    #[test]
    fn test_permissions_for_staff() {
        let perms = permissions_for(Role::Staff);
        assert!(perms.contains(&ORDERS_MANAGE));
        assert!(!perms.contains(&USERS_MANAGE));
    }
}
