//! Creation order for repository-manager roles.
//!
//! A role may only be created once every role it contains exists. Roles are
//! sorted topologically over their `contained_roles` edges; among roles that
//! are ready at the same time the lexically smallest name goes first, so the
//! order is deterministic.

use crate::types::Role;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOrder<'a> {
    /// Roles whose dependencies are satisfied, in creation order.
    pub ordered: Vec<&'a Role>,
    /// Roles on (or behind) a containment cycle, lexically sorted.
    pub cyclic: Vec<&'a Role>,
}

impl<'a> RoleOrder<'a> {
    pub fn has_cycle(&self) -> bool {
        !self.cyclic.is_empty()
    }

    /// Every role once: the acyclic prefix followed by the cyclic remainder.
    pub fn creation(&self) -> impl Iterator<Item = &'a Role> + '_ {
        self.ordered.iter().chain(self.cyclic.iter()).copied()
    }

    /// Reverse of [`RoleOrder::creation`]; dependents before their
    /// dependencies.
    pub fn removal(&self) -> impl Iterator<Item = &'a Role> + '_ {
        self.ordered
            .iter()
            .rev()
            .chain(self.cyclic.iter().rev())
            .copied()
    }
}

/// Orders roles so that contained roles come first. Containment edges that
/// point outside `roles` are treated as already satisfied.
pub fn creation_order(roles: &[Role]) -> RoleOrder<'_> {
    let by_name: BTreeMap<&str, &Role> = roles.iter().map(|r| (r.name.as_str(), r)).collect();

    let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for role in by_name.values().copied() {
        let deps: BTreeSet<&str> = role
            .contained_roles
            .iter()
            .map(String::as_str)
            .filter(|dep| by_name.contains_key(dep) && *dep != role.name)
            .collect();
        pending.insert(role.name.as_str(), deps.len());
        for dep in deps {
            dependents.entry(dep).or_default().push(role.name.as_str());
        }
    }

    let mut ready: BTreeSet<&str> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(name, _)| *name)
        .collect();
    let mut ordered = Vec::with_capacity(by_name.len());

    while let Some(name) = ready.pop_first() {
        pending.remove(name);
        ordered.push(by_name[name]);

        for dependent in dependents.get(name).into_iter().flatten() {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(*dependent);
                }
            }
        }
    }

    // Anything still pending sits on a cycle or depends on one.
    let cyclic = pending.keys().map(|name| by_name[name]).collect();

    RoleOrder { ordered, cyclic }
}
