//! Sidebar entries each role may see.

use crate::session::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub path: &'static str,
    pub label: &'static str,
}

const DASHBOARD: MenuItem = MenuItem { path: "/", label: "Dashboard" };
const HOUSEHOLDS: MenuItem = MenuItem { path: "/households", label: "Households" };
const RESIDENTS: MenuItem = MenuItem { path: "/residents", label: "Residents" };
const TEMPORARY_RESIDENCE: MenuItem = MenuItem { path: "/temporary-residence", label: "Temporary residence" };
const TEMPORARY_ABSENCE: MenuItem = MenuItem { path: "/temporary-absence", label: "Temporary absence" };
const FEES: MenuItem = MenuItem { path: "/fees", label: "Fees" };

/// Menu entries for `role`, in display order.
pub fn visible_menu(role: Role) -> Vec<MenuItem> {
    match role {
        Role::Admin => vec![
            DASHBOARD,
            HOUSEHOLDS,
            RESIDENTS,
            TEMPORARY_RESIDENCE,
            TEMPORARY_ABSENCE,
            FEES,
        ],
        Role::Accountant => vec![FEES],
        Role::Resident => Vec::new(),
    }
}

/// Whether `role` may open `path`.
pub fn can_open(role: Role, path: &str) -> bool {
    visible_menu(role).iter().any(|item| item.path == path)
}
