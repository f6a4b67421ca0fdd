use crate::annotate::{derive_status, CheckboxStatus};
use crate::node::{ContentNode, NodePath, NodeRef};
use crate::selection::{SelectionSet, SelectionStore};

/// The store mutation a toggle ended up performing
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum ToggleAction {
    /// The subtree was added to the inclusion set
    Included,
    /// The node's own omission was withdrawn, an ancestor covers it again
    Restored,
    /// A carve-out was added below an ancestor inclusion
    Excluded,
    /// The node's own entry and everything below it were withdrawn
    Withdrawn,
}

/// Flip the selection of `node`, located below `path`.
///
/// A checked or indeterminate node ends up unchecked, an unchecked node
/// ends up checked, together with its whole subtree in both cases.
pub fn toggle(
    node: &ContentNode,
    path: &NodePath,
    store: &mut SelectionStore,
) -> ToggleAction {
    let status = derive_status(node, path, store);
    let action = match status {
        CheckboxStatus::Unchecked => select(node, path, store),
        CheckboxStatus::Checked | CheckboxStatus::Indeterminate => {
            deselect(node, path, store)
        }
    };
    log::debug!("toggle: {} was {:?}, {:?}", node.id, status, action);
    action
}

fn select(
    node: &ContentNode,
    path: &NodePath,
    store: &mut SelectionStore,
) -> ToggleAction {
    if store.is_omitted(&node.id) && covered_by_ancestor(path, store) {
        store.remove_inclusion_or_exclusion(&node.id);
        ToggleAction::Restored
    } else {
        store.add_inclusion(NodeRef::of(node, path));
        ToggleAction::Included
    }
}

fn deselect(
    node: &ContentNode,
    path: &NodePath,
    store: &mut SelectionStore,
) -> ToggleAction {
    let own_entry = store.is_included(&node.id) || store.is_omitted(&node.id);
    if !own_entry && covered_by_ancestor(path, store) {
        store.add_exclusion(NodeRef::of(node, path));
        return ToggleAction::Excluded;
    }

    if store.is_included(&node.id) {
        store.remove_inclusion_or_exclusion(&node.id);
    }
    store.prune_descendants(SelectionSet::Included, &node.id);
    store.prune_descendants(SelectionSet::Omitted, &node.id);

    if covered_by_ancestor(path, store) && !store.is_omitted(&node.id) {
        store.add_exclusion(NodeRef::of(node, path));
        ToggleAction::Excluded
    } else {
        ToggleAction::Withdrawn
    }
}

/// True if the nearest entry among the ancestors is an inclusion
fn covered_by_ancestor(path: &NodePath, store: &SelectionStore) -> bool {
    path.ids_nearest_first()
        .find_map(|id| {
            if store.is_included(id) {
                Some(true)
            } else if store.is_omitted(id) {
                Some(false)
            } else {
                None
            }
        })
        .unwrap_or(false)
}
