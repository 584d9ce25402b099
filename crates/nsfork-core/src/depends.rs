//! Dependency sets of a namespace.
//!
//! A namespace depends on the owner of every var it maps. The shallow set
//! covers a single namespace's own bindings; the deep set is the transitive
//! closure of that relation, computed with an explicit worklist.
//!
//! # Known limitation
//!
//! Only var bindings count as evidence of a dependency. A namespace that
//! reaches another one solely through values (for example a function object
//! stored in a local binding) is not detected, and neither are imports of
//! host-level names. Isolated views seeded from these sets can therefore be
//! missing namespaces that are only reachable that way.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use nsfork_common::types::Symbol;

use crate::namespace::{Namespace, NamespaceId};

/// An unordered set of namespaces with identity semantics.
#[derive(Debug, Clone, Default)]
pub struct NamespaceSet {
    members: HashMap<NamespaceId, Arc<Namespace>>,
}

impl NamespaceSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding only `ns`.
    #[must_use]
    pub fn singleton(ns: &Arc<Namespace>) -> Self {
        let mut set = Self::new();
        let _ = set.insert(Arc::clone(ns));
        set
    }

    /// Adds `ns`, returning `true` if it was not already a member.
    pub fn insert(&mut self, ns: Arc<Namespace>) -> bool {
        match self.members.entry(ns.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let _ = slot.insert(ns);
                true
            }
        }
    }

    /// Returns `true` if `ns` is a member.
    #[must_use]
    pub fn contains(&self, ns: &Namespace) -> bool {
        self.members.contains_key(&ns.id())
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the members in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Namespace>> {
        self.members.values()
    }

    /// Returns the members' names, sorted.
    ///
    /// Distinct namespaces sharing a name appear once per namespace.
    #[must_use]
    pub fn names(&self) -> Vec<Symbol> {
        let mut names: Vec<Symbol> = self.iter().map(|ns| ns.name().clone()).collect();
        names.sort();
        names
    }

    /// Returns `true` if every member of `self` is also in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.members.keys().all(|id| other.members.contains_key(id))
    }
}

impl IntoIterator for NamespaceSet {
    type Item = Arc<Namespace>;
    type IntoIter = std::collections::hash_map::IntoValues<NamespaceId, Arc<Namespace>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_values()
    }
}

impl Extend<Arc<Namespace>> for NamespaceSet {
    fn extend<T: IntoIterator<Item = Arc<Namespace>>>(&mut self, iter: T) {
        for ns in iter {
            let _ = self.insert(ns);
        }
    }
}

impl FromIterator<Arc<Namespace>> for NamespaceSet {
    fn from_iter<T: IntoIterator<Item = Arc<Namespace>>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Computes the namespaces `ns` depends on.
///
/// The result always contains `ns` itself. With `deep = false` it adds the
/// owner of every var mapped directly in `ns`; with `deep = true` it is the
/// transitive closure of that relation.
#[must_use]
pub fn depends(ns: &Arc<Namespace>, deep: bool) -> NamespaceSet {
    let direct = shallow(ns);
    if !deep {
        return direct;
    }

    let mut accumulated = NamespaceSet::singleton(ns);
    let mut pending: Vec<Arc<Namespace>> = direct
        .into_iter()
        .filter(|dep| !accumulated.contains(dep))
        .collect();

    while let Some(next) = pending.pop() {
        if !accumulated.insert(Arc::clone(&next)) {
            continue;
        }
        pending.extend(
            shallow(&next)
                .into_iter()
                .filter(|dep| !accumulated.contains(dep)),
        );
    }

    tracing::trace!(
        namespace = %ns.name(),
        closure = accumulated.len(),
        "dependency closure computed"
    );
    accumulated
}

fn shallow(ns: &Arc<Namespace>) -> NamespaceSet {
    let mut set = NamespaceSet::singleton(ns);
    set.extend(ns.var_owners());
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryView;

    fn refer(from: &Arc<Namespace>, to: &Arc<Namespace>, sym: &str) {
        let _ = from.refer(sym, to.intern(sym));
    }

    #[test]
    fn shallow_of_isolated_namespace_is_itself() {
        let core = Namespace::new("core");
        let _ = core.intern("map");
        let deps = depends(&core, false);
        assert_eq!(deps.len(), 1);
        assert!(deps.contains(&core));
    }

    #[test]
    fn shallow_adds_direct_var_owners_only() {
        let base = Namespace::new("base");
        let core = Namespace::new("core");
        let app = Namespace::new("app");
        refer(&core, &base, "id");
        refer(&app, &core, "map");
        let _ = app.import("String", "java.lang.String");

        let deps = depends(&app, false);
        assert_eq!(deps.names(), vec![Symbol::new("app"), Symbol::new("core")]);
        assert!(!deps.contains(&base));
    }

    #[test]
    fn deep_follows_chains() {
        let base = Namespace::new("base");
        let core = Namespace::new("core");
        let app = Namespace::new("app");
        refer(&core, &base, "id");
        refer(&app, &core, "map");

        let deps = depends(&app, true);
        assert_eq!(
            deps.names(),
            vec![Symbol::new("app"), Symbol::new("base"), Symbol::new("core")]
        );
    }

    #[test]
    fn deep_terminates_on_cycles() {
        let a = Namespace::new("a");
        let b = Namespace::new("b");
        refer(&a, &b, "from-b");
        refer(&b, &a, "from-a");

        let deps = depends(&a, true);
        assert_eq!(deps.len(), 2);
        assert!(deps.contains(&a));
        assert!(deps.contains(&b));
    }

    #[test]
    fn deep_closure_is_closed_under_shallow() {
        let nodes: Vec<_> = (0..6).map(|i| Namespace::new(format!("n{i}"))).collect();
        refer(&nodes[0], &nodes[1], "x");
        refer(&nodes[0], &nodes[2], "y");
        refer(&nodes[1], &nodes[3], "z");
        refer(&nodes[3], &nodes[1], "w");
        refer(&nodes[2], &nodes[4], "v");
        refer(&nodes[5], &nodes[0], "u");

        let closure = depends(&nodes[0], true);
        assert_eq!(closure.len(), 5);
        assert!(!closure.contains(&nodes[5]));
        for member in closure.iter() {
            assert!(depends(member, false).is_subset(&closure));
        }
    }

    #[test]
    fn deep_closure_survives_removal_of_intermediate_namespace() {
        let root = RegistryView::new();
        let base = root.put_if_absent("base", Namespace::new("base"));
        let lib = root.put_if_absent("lib", Namespace::new("lib"));
        let app = root.put_if_absent("app", Namespace::new("app"));
        refer(&lib, &base, "id");
        refer(&app, &lib, "helper");
        drop(lib);
        let removed = root.remove("lib");
        assert!(removed.is_some());
        drop(removed);

        let deps = depends(&app, true);
        assert_eq!(
            deps.names(),
            vec![Symbol::new("app"), Symbol::new("base"), Symbol::new("lib")]
        );
        assert!(deps.contains(&base));
    }

    #[test]
    fn same_name_different_objects_are_both_kept() {
        let app = Namespace::new("app");
        let old = Namespace::new("lib");
        let new = Namespace::new("lib");
        refer(&app, &old, "a");
        refer(&app, &new, "b");

        let deps = depends(&app, false);
        assert_eq!(deps.len(), 3);
    }
}
