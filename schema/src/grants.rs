//! # Permission Tables
//!
//! Literal ACL policy per `(tier, role)`. Every `{name}` in a resource id is
//! replaced with the context name; nothing else is derived. Entry order is the
//! order in which grants are applied.

use crate::types::{
    Action::{self, Create, Delete, Full, Read, Update},
    GroupRole, PermissionGrant, PermissionTables, RoleGrants, Tier,
};

const PLACEHOLDER: &str = "{name}";

const CRUD: &[Action] = &[Create, Delete, Read, Update];

type GrantTable = &'static [(&'static str, &'static [Action])];

pub const PROD_DEV: GrantTable = &[
    ("dcos:adminrouter:ops:historyservice", &[Full]),
    ("dcos:adminrouter:ops:mesos", &[Full]),
    ("dcos:adminrouter:ops:networking", &[Full]),
    ("dcos:adminrouter:ops:slave", &[Full]),
    ("dcos:adminrouter:ops:system-health", &[Full]),
    ("dcos:adminrouter:service:marathon", &[Full]),
    ("dcos:adminrouter:service:metronome", &[Full]),
    ("dcos:mesos:agent:executor:app_id:/{name}", &[Read]),
    ("dcos:mesos:agent:framework:role:slave_public", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}", &[Read]),
    ("dcos:mesos:agent:task:app_id:/{name}", &[Read]),
    ("dcos:mesos:master:executor:app_id:/{name}", &[Read]),
    ("dcos:mesos:master:framework:role:slave_public", &[Read]),
    ("dcos:mesos:master:task:app_id:/{name}", &[Read]),
    ("dcos:secrets:default:/{name}", &[Read]),
    ("dcos:service:marathon:marathon:services:/{name}", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}", &[Read]),
];

// Carries the production policy as deployed, including the unslashed executor
// id and the fixed `infosysbub` entries.
pub const PROD_DEVOPS: GrantTable = &[
    ("dcos:adminrouter:ops:historyservice", &[Full]),
    ("dcos:adminrouter:ops:mesos", &[Full]),
    ("dcos:adminrouter:ops:metadata", &[Full]),
    ("dcos:adminrouter:ops:networking", &[Full]),
    ("dcos:adminrouter:package", &[Full]),
    ("dcos:adminrouter:ops:slave", &[Full]),
    ("dcos:adminrouter:ops:system-health", &[Full]),
    ("dcos:adminrouter:secrets", &[Full]),
    ("dcos:adminrouter:service:marathon", &[Full]),
    ("dcos:adminrouter:service:metronome", &[Full]),
    ("dcos:mesos:agent:endpoint:path:/monitor/statistics", &[Read]),
    ("dcos:mesos:agent:executor:app_id:{name}", &[Read]),
    ("dcos:mesos:agent:flags", &[Read]),
    ("dcos:mesos:agent:framework:role:*", &[Read]),
    ("dcos:mesos:agent:framework:role:slave_public", &[Read]),
    ("dcos:mesos:agent:log", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}", &[Read]),
    ("dcos:mesos:agent:task:app_id:/{name}", &[Read]),
    ("dcos:mesos:master:endpoint:path", &[Read]),
    ("dcos:mesos:master:executor:app_id:/{name}", &[Read]),
    ("dcos:mesos:master:framework:role:*", &[Read]),
    ("dcos:mesos:master:framework:role:slave_public", &[Read]),
    ("dcos:mesos:master:log", &[Read]),
    ("dcos:mesos:master:task:app_id:/infosysbub", &[Read]),
    ("dcos:secrets:list:default:/", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}/preprod", CRUD),
    ("dcos:service:metronome:metronome:jobs:/{name}/prod", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}", &[Read]),
    ("dcos:service:marathon:marathon:services:/{name}infosysbub/preprod", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/prod", CRUD),
];

pub const NON_PROD_DEV: GrantTable = &[
    ("dcos:adminrouter:ops:historyservice", &[Full]),
    ("dcos:adminrouter:ops:mesos", &[Full]),
    ("dcos:adminrouter:ops:metadata", &[Full]),
    ("dcos:adminrouter:ops:networking", &[Full]),
    ("dcos:adminrouter:ops:slave", &[Full]),
    ("dcos:adminrouter:ops:system-health", &[Full]),
    ("dcos:adminrouter:service:marathon", &[Full]),
    ("dcos:adminrouter:service:metronome", &[Full]),
    ("dcos:mesos:agent:executor:app_id:/{name}", &[Read]),
    ("dcos:mesos:agent:framework:role:slave_public", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}/dev", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}/lpt", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}/pen", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}/rc", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}/scrub", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}/uat", &[Read]),
    ("dcos:mesos:agent:task:app_id:/{name}", &[Read]),
    ("dcos:mesos:master:executor:app_id:/{name}", &[Read]),
    ("dcos:mesos:master:framework:role:slave_public", &[Read]),
    ("dcos:mesos:master:task:app_id:/{name}", &[Read]),
    ("dcos:secrets:default:/{name}/dev", CRUD),
    ("dcos:secrets:default:/{name}/scrub", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/dev", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/lpt", &[Read]),
    ("dcos:service:marathon:marathon:services:/{name}/pen", &[Read]),
    ("dcos:service:marathon:marathon:services:/{name}/rc", &[Read]),
    ("dcos:service:marathon:marathon:services:/{name}/scrub", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/uat", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}/dev", CRUD),
    ("dcos:service:metronome:metronome:jobs:/{name}/lpt", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}/pen", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}/rc", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}/scrub", CRUD),
    ("dcos:service:metronome:metronome:jobs:/{name}/uat", &[Read]),
];

pub const NON_PROD_DEVOPS: GrantTable = &[
    ("dcos:adminrouter:ops:historyservice", &[Full]),
    ("dcos:adminrouter:ops:mesos", &[Full]),
    ("dcos:adminrouter:ops:metadata", &[Full]),
    ("dcos:adminrouter:ops:networking", &[Full]),
    ("dcos:adminrouter:package", &[Full]),
    ("dcos:adminrouter:ops:slave", &[Full]),
    ("dcos:adminrouter:ops:system-health", &[Full]),
    ("dcos:adminrouter:secrets", &[Full]),
    ("dcos:adminrouter:service:marathon", &[Full]),
    ("dcos:adminrouter:service:metronome", &[Full]),
    ("dcos:mesos:agent:endpoint:path:/monitor/statistics", &[Read]),
    ("dcos:mesos:agent:executor:app_id:/{name}", &[Read]),
    ("dcos:mesos:agent:flags", &[Read]),
    ("dcos:mesos:agent:framework:role:*", &[Read]),
    ("dcos:mesos:agent:framework:role:slave_public", &[Read]),
    ("dcos:mesos:agent:log", &[Read]),
    ("dcos:mesos:agent:sandbox:app_id:/{name}", &[Read]),
    ("dcos:mesos:agent:task:app_id:/{name}", &[Read]),
    ("dcos:mesos:master:endpoint:path", &[Read]),
    ("dcos:mesos:master:executor:app_id:/{name}", &[Read]),
    ("dcos:mesos:master:framework:role:*", &[Read]),
    ("dcos:mesos:master:framework:role:slave_public", &[Read]),
    ("dcos:mesos:master:log", &[Read]),
    ("dcos:mesos:master:task:app_id:/{name}", &[Read]),
    ("dcos:secrets:list:default:/", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}", &[Read]),
    ("dcos:service:metronome:metronome:jobs:/{name}/uat", CRUD),
    ("dcos:service:metronome:metronome:jobs:/{name}/scrub", CRUD),
    ("dcos:service:metronome:metronome:jobs:/{name}/rc", CRUD),
    ("dcos:service:metronome:metronome:jobs:/{name}/pen", CRUD),
    ("dcos:service:metronome:metronome:jobs:/{name}/lpt", CRUD),
    ("dcos:service:metronome:metronome:jobs:/{name}/dev", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}", &[Read]),
    ("dcos:service:marathon:marathon:services:/{name}/uat", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/scrub", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/rc", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/pen", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/lpt", CRUD),
    ("dcos:service:marathon:marathon:services:/{name}/dev", CRUD),
];

/// Raw table for a `(tier, role)` pair, before name substitution.
pub fn table(tier: Tier, role: GroupRole) -> GrantTable {
    match (tier, role) {
        (Tier::Prod, GroupRole::Dev) => PROD_DEV,
        (Tier::Prod, GroupRole::Devops) => PROD_DEVOPS,
        (Tier::NonProd, GroupRole::Dev) => NON_PROD_DEV,
        (Tier::NonProd, GroupRole::Devops) => NON_PROD_DEVOPS,
    }
}

/// Instantiates the table of one `(tier, role)` pair for a context.
pub fn grants_for(name: &str, tier: Tier, role: GroupRole) -> Vec<PermissionGrant> {
    table(tier, role)
        .iter()
        .map(|(resource, actions)| PermissionGrant {
            resource: resource.replace(PLACEHOLDER, name),
            actions: actions.to_vec(),
        })
        .collect()
}

pub fn permission_tables(name: &str) -> PermissionTables {
    let role_grants = |tier| RoleGrants {
        dev: grants_for(name, tier, GroupRole::Dev),
        devops: grants_for(name, tier, GroupRole::Devops),
    };

    PermissionTables {
        prod: role_grants(Tier::Prod),
        non_prod: role_grants(Tier::NonProd),
    }
}
