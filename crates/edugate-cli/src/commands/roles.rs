//! Role hierarchy listing.

use edugate_rbac::{Role, RolePolicy};

use crate::style::styled_table;

pub fn run() {
    let mut table = styled_table(&["Role", "Label", "Rank", "Admin", "Home", "Manages"]);

    for role in Role::ALL {
        let policy = RolePolicy::for_role(role);
        let manages = if role == Role::SystemAdmin {
            "everyone".to_string()
        } else if policy.is_terminal() {
            "-".to_string()
        } else {
            policy
                .managed_roles()
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        table.add_row(vec![
            role.as_str().to_string(),
            role.label().to_string(),
            policy.level().to_string(),
            if policy.is_admin() { "yes" } else { "no" }.to_string(),
            role.home_path().to_string(),
            manages,
        ]);
    }

    println!("{table}");
}
