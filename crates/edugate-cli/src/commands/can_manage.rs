//! Role management check.

use edugate_rbac::{Role, RolePolicy};

pub fn run(actor: Role, target: Role) {
    let policy = RolePolicy::for_role(actor);

    let verb = if policy.can_manage(target) {
        "can"
    } else {
        "cannot"
    };
    println!("{actor} {verb} manage {target}");

    if policy.has_access_to(target) {
        println!("{actor} has hierarchical access to {target}");
    }
}
