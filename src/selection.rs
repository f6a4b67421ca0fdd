use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodePath, NodeRef};

/// Which of the two selection sets an entry lives in
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSet {
    Included,
    Omitted,
}

/// The nearest explicit entry found along an ancestor-or-self chain
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Decision<'a> {
    pub set: SelectionSet,
    pub by: &'a NodeId,
}

/// Compact record of what is selected for transfer.
///
/// A selection is a set of subtrees to include (`Included`) together with
/// carve-outs inside them (`Omitted`). No id is ever present in both sets,
/// and every addition prunes the entries it makes redundant. Driven
/// through [`crate::toggle::toggle`], the sets additionally stay minimal:
/// - no entry is implied by its nearest ancestor entry,
/// - every omission lies where an ancestor inclusion would otherwise
///   cover it.
///
/// Deriving the status of a node is then a walk over its ancestors rather
/// than over the whole tree, see [`crate::annotate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionStore {
    included: HashMap<NodeId, NodeRef>,
    omitted: HashMap<NodeId, NodeRef>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_included(&self, id: &NodeId) -> bool {
        self.included.contains_key(id)
    }

    pub fn is_omitted(&self, id: &NodeId) -> bool {
        self.omitted.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.omitted.is_empty()
    }

    /// Entries of the inclusion set, ordered by id
    pub fn included(&self) -> Vec<NodeRef> {
        sorted(&self.included)
    }

    /// Entries of the omission set, ordered by id
    pub fn omitted(&self) -> Vec<NodeRef> {
        sorted(&self.omitted)
    }

    /// Overwrite the inclusion set, e.g. when resuming a session
    pub fn replace_included(
        &mut self,
        nodes: impl IntoIterator<Item = NodeRef>,
    ) {
        self.included = keyed(nodes);
        log::debug!("selection: {} inclusions restored", self.included.len());
    }

    /// Overwrite the omission set, e.g. when resuming a session
    pub fn replace_omitted(
        &mut self,
        nodes: impl IntoIterator<Item = NodeRef>,
    ) {
        self.omitted = keyed(nodes);
        log::debug!("selection: {} omissions restored", self.omitted.len());
    }

    pub fn clear(&mut self) {
        self.included.clear();
        self.omitted.clear();
    }

    /// Mark the whole subtree of `node` for transfer.
    ///
    /// Omissions inside the subtree and inclusions of descendants become
    /// redundant and are dropped.
    pub fn add_inclusion(&mut self, node: NodeRef) {
        self.omitted.remove(&node.id);
        let omissions = self.prune_descendants(SelectionSet::Omitted, &node.id);
        let inclusions =
            self.prune_descendants(SelectionSet::Included, &node.id);
        log::debug!(
            "selection: including {} (pruned {} omissions, {} inclusions)",
            node.id,
            omissions,
            inclusions
        );
        self.included.insert(node.id.clone(), node);
        self.debug_check();
    }

    /// Carve the subtree of `node` out of the selection.
    ///
    /// Every entry below `node` is superseded by the new exclusion.
    pub fn add_exclusion(&mut self, node: NodeRef) {
        self.included.remove(&node.id);
        let inclusions =
            self.prune_descendants(SelectionSet::Included, &node.id);
        let omissions = self.prune_descendants(SelectionSet::Omitted, &node.id);
        log::debug!(
            "selection: omitting {} (pruned {} inclusions, {} omissions)",
            node.id,
            inclusions,
            omissions
        );
        self.omitted.insert(node.id.clone(), node);
        self.debug_check();
    }

    /// Delete the exact entry for `id` from whichever set holds it
    pub fn remove_inclusion_or_exclusion(&mut self, id: &NodeId) {
        if self.included.remove(id).is_some() {
            log::debug!("selection: inclusion of {} withdrawn", id);
        } else if self.omitted.remove(id).is_some() {
            log::debug!("selection: omission of {} withdrawn", id);
        }
    }

    /// Remove every strict descendant of `ancestor` from `set`,
    /// returning how many entries were dropped.
    pub fn prune_descendants(
        &mut self,
        set: SelectionSet,
        ancestor: &NodeId,
    ) -> usize {
        let entries = match set {
            SelectionSet::Included => &mut self.included,
            SelectionSet::Omitted => &mut self.omitted,
        };
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_descendant_of(ancestor));
        before - entries.len()
    }

    /// Find the nearest explicit entry for the node `id` located at
    /// `path`, looking at the node itself first and then at its
    /// ancestors from the parent up to the root.
    pub fn resolve<'a>(
        &self,
        id: &'a NodeId,
        path: &'a NodePath,
    ) -> Option<Decision<'a>> {
        std::iter::once(id)
            .chain(path.ids_nearest_first())
            .find_map(|candidate| {
                if self.included.contains_key(candidate) {
                    Some(Decision {
                        set: SelectionSet::Included,
                        by: candidate,
                    })
                } else if self.omitted.contains_key(candidate) {
                    Some(Decision {
                        set: SelectionSet::Omitted,
                        by: candidate,
                    })
                } else {
                    None
                }
            })
    }

    pub fn has_included_descendant(&self, id: &NodeId) -> bool {
        self.included
            .values()
            .any(|entry| entry.is_descendant_of(id))
    }

    pub fn has_omitted_descendant(&self, id: &NodeId) -> bool {
        self.omitted
            .values()
            .any(|entry| entry.is_descendant_of(id))
    }

    /// Ids present in both sets. Always empty unless the sets were
    /// hydrated from inconsistent data.
    pub fn conflicting_ids(&self) -> Vec<NodeId> {
        self.included
            .keys()
            .filter(|id| self.omitted.contains_key(*id))
            .cloned()
            .sorted()
            .collect()
    }

    fn debug_check(&self) {
        debug_assert!(
            self.conflicting_ids().is_empty(),
            "ids both included and omitted: {:?}",
            self.conflicting_ids()
        );
    }
}

fn keyed(nodes: impl IntoIterator<Item = NodeRef>) -> HashMap<NodeId, NodeRef> {
    nodes
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect()
}

fn sorted(entries: &HashMap<NodeId, NodeRef>) -> Vec<NodeRef> {
    entries
        .values()
        .cloned()
        .sorted_by(|a, b| a.id.cmp(&b.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, node_ref};

    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    fn ids(nodes: Vec<NodeRef>) -> Vec<String> {
        nodes.into_iter().map(|n| n.id.to_string()).collect()
    }

    #[test]
    fn inclusion_prunes_descendant_entries() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("leaf_a"));
        store.add_inclusion(node_ref("subtopic_2"));
        store.add_inclusion(node_ref("topic_2"));
        store.add_exclusion(node_ref("leaf_e"));

        store.add_inclusion(node_ref("channel_1"));

        assert_eq!(ids(store.included()), vec!["channel_1"]);
        assert!(store.omitted().is_empty());
    }

    #[test]
    fn inclusion_removes_own_omission() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("topic_1"));
        store.add_exclusion(node_ref("subtopic_1"));
        assert!(store.is_omitted(&"subtopic_1".into()));

        store.add_inclusion(node_ref("subtopic_1"));
        assert!(!store.is_omitted(&"subtopic_1".into()));
        assert!(store.is_included(&"subtopic_1".into()));
    }

    #[test]
    fn exclusion_supersedes_descendant_entries() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("channel_1"));
        store.add_exclusion(node_ref("leaf_a"));
        store.add_inclusion(node_ref("leaf_a"));
        store.add_exclusion(node_ref("subtopic_2"));

        store.add_exclusion(node_ref("topic_1"));

        assert_eq!(ids(store.included()), vec!["channel_1"]);
        assert_eq!(ids(store.omitted()), vec!["topic_1"]);
    }

    #[test]
    fn exclusion_of_included_node_moves_it() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("topic_1"));
        store.add_exclusion(node_ref("topic_1"));
        assert!(!store.is_included(&"topic_1".into()));
        assert!(store.is_omitted(&"topic_1".into()));
    }

    #[test]
    fn remove_is_exact_and_tolerates_absent_ids() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("topic_1"));
        store.add_exclusion(node_ref("subtopic_1"));

        store.remove_inclusion_or_exclusion(&"leaf_e".into());
        store.remove_inclusion_or_exclusion(&"subtopic_1".into());

        assert_eq!(ids(store.included()), vec!["topic_1"]);
        assert!(store.omitted().is_empty());

        store.remove_inclusion_or_exclusion(&"topic_1".into());
        assert!(store.is_empty());
    }

    #[test]
    fn replace_overwrites_sets() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("topic_2"));

        store.replace_included(vec![node_ref("topic_1")]);
        store.replace_omitted(vec![node_ref("subtopic_1")]);

        assert_eq!(ids(store.included()), vec!["topic_1"]);
        assert_eq!(ids(store.omitted()), vec!["subtopic_1"]);
        assert!(!store.is_included(&"topic_2".into()));
    }

    #[test]
    fn conflicting_ids_reports_hydrated_overlap() {
        let mut store = SelectionStore::new();
        store.replace_included(vec![node_ref("topic_1"), node_ref("leaf_e")]);
        store.replace_omitted(vec![node_ref("topic_1")]);
        assert_eq!(store.conflicting_ids(), vec![NodeId::from("topic_1")]);
    }

    #[rstest]
    #[case::own_entry("topic_1", Some((SelectionSet::Included, "topic_1")))]
    #[case::nearest_omission(
        "leaf_a",
        Some((SelectionSet::Omitted, "subtopic_1"))
    )]
    #[case::ancestor_inclusion(
        "leaf_c",
        Some((SelectionSet::Included, "topic_1"))
    )]
    #[case::unrelated("leaf_e", None)]
    fn resolve_finds_nearest_entry(
        #[case] id: &str,
        #[case] expected: Option<(SelectionSet, &str)>,
    ) {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("topic_1"));
        store.add_exclusion(node_ref("subtopic_1"));

        let id = NodeId::from(id);
        let path = fixtures::path(id.as_str());
        let decision = store.resolve(&id, &path);
        assert_eq!(
            decision.map(|d| (d.set, d.by.to_string())),
            expected.map(|(set, by)| (set, by.to_owned()))
        );
    }

    #[test]
    fn adding_inclusion_twice_is_idempotent() {
        let mut once = SelectionStore::new();
        once.add_exclusion(node_ref("leaf_a"));
        once.add_inclusion(node_ref("subtopic_1"));

        let mut twice = once.clone();
        twice.add_inclusion(node_ref("subtopic_1"));

        assert_eq!(once, twice);
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Include(&'static str),
        Exclude(&'static str),
        Remove(&'static str),
    }

    #[derive(Clone, Debug)]
    struct OperationSequence(Vec<Operation>);

    impl Arbitrary for OperationSequence {
        fn arbitrary(g: &mut Gen) -> Self {
            let all = fixtures::ids();
            let size = usize::arbitrary(g) % 40 + 1;
            let ops = (0..size)
                .map(|_| {
                    let id = *g.choose(&all).unwrap();
                    match u8::arbitrary(g) % 3 {
                        0 => Operation::Include(id),
                        1 => Operation::Exclude(id),
                        _ => Operation::Remove(id),
                    }
                })
                .collect();
            OperationSequence(ops)
        }
    }

    fn apply(store: &mut SelectionStore, op: &Operation) {
        match op {
            Operation::Include(id) => store.add_inclusion(node_ref(id)),
            Operation::Exclude(id) => store.add_exclusion(node_ref(id)),
            Operation::Remove(id) => {
                store.remove_inclusion_or_exclusion(&NodeId::from(*id))
            }
        }
    }

    #[quickcheck]
    fn prop_no_dual_membership(OperationSequence(ops): OperationSequence) {
        let mut store = SelectionStore::new();
        for op in &ops {
            apply(&mut store, op);
            assert!(store.conflicting_ids().is_empty(), "after {:?}", op);
        }
    }

    #[quickcheck]
    fn prop_additions_leave_no_entries_below(
        OperationSequence(ops): OperationSequence,
    ) {
        let mut store = SelectionStore::new();
        for op in &ops {
            apply(&mut store, op);
            let (id, sets) = match op {
                Operation::Include(id) => (*id, vec![store.omitted()]),
                Operation::Exclude(id) => {
                    (*id, vec![store.included(), store.omitted()])
                }
                Operation::Remove(_) => continue,
            };
            let id = NodeId::from(id);
            for set in sets {
                assert!(
                    !set.iter().any(|entry| entry.is_descendant_of(&id)),
                    "entries left below {} after {:?}",
                    id,
                    op
                );
            }
        }
    }

    #[quickcheck]
    fn prop_inclusion_is_idempotent(
        OperationSequence(ops): OperationSequence,
        pick: usize,
    ) {
        let mut store = SelectionStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        let all = fixtures::ids();
        let id = all[pick % all.len()];

        store.add_inclusion(node_ref(id));
        let once = store.clone();
        store.add_inclusion(node_ref(id));
        assert_eq!(once, store);
    }
}
