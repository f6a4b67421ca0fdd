use serde::Serialize;

use crate::node::{ContentNode, NodeId, NodeKind, NodePath};
use crate::selection::{SelectionSet, SelectionStore};
use crate::transfer::TransferType;

/// Checkbox state of a row
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckboxStatus {
    Checked,
    Unchecked,
    /// Some, but not all, of a topic's descendants are selected
    Indeterminate,
}

/// Why a row cannot be selected
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowNote {
    /// Every resource is already at the destination
    AlreadyOnDevice,
    /// Nothing under the node is on the device, so nothing to export
    NotOnDevice,
    /// The node is filtered out for the current transfer type
    Unavailable,
    /// The node has no resources at all
    Empty,
}

/// A node decorated for display
#[derive(Eq, PartialEq, Clone, Debug, Serialize)]
pub struct AnnotatedNode {
    pub id: NodeId,
    pub title: String,
    pub kind: NodeKind,
    pub status: CheckboxStatus,
    pub checked: bool,
    pub indeterminate: bool,
    /// Full display path: the ancestors followed by the node itself
    pub path: NodePath,
    pub disabled: bool,
    pub note: Option<RowNote>,
}

/// Derive the checkbox status of `node`, whose ancestors are `path`.
///
/// The nearest explicit entry on the node-to-root chain decides between
/// checked and unchecked. A topic whose subtree mixes both decisions is
/// indeterminate instead.
pub fn derive_status(
    node: &ContentNode,
    path: &NodePath,
    store: &SelectionStore,
) -> CheckboxStatus {
    let checked = matches!(
        store.resolve(&node.id, path),
        Some(decision) if decision.set == SelectionSet::Included
    );
    if !node.is_topic() {
        return if checked {
            CheckboxStatus::Checked
        } else {
            CheckboxStatus::Unchecked
        };
    }

    match checked {
        true if store.has_omitted_descendant(&node.id) => {
            CheckboxStatus::Indeterminate
        }
        true => CheckboxStatus::Checked,
        false if store.has_included_descendant(&node.id) => {
            CheckboxStatus::Indeterminate
        }
        false => CheckboxStatus::Unchecked,
    }
}

/// Decorate `node` with its selection status, full path and whether it
/// can take part in a `transfer_type` transfer at all.
pub fn annotate(
    node: &ContentNode,
    path: &NodePath,
    store: &SelectionStore,
    transfer_type: TransferType,
) -> AnnotatedNode {
    let status = derive_status(node, path, store);
    let note = row_note(node, transfer_type);
    log::trace!("annotate: {} is {:?} ({:?})", node.id, status, note);

    AnnotatedNode {
        id: node.id.clone(),
        title: node.title.clone(),
        kind: node.kind,
        status,
        checked: status == CheckboxStatus::Checked,
        indeterminate: status == CheckboxStatus::Indeterminate,
        path: path.child(node.stub()),
        disabled: note.is_some(),
        note,
    }
}

/// Why `node` cannot be selected for a `transfer_type` transfer, if at all
pub(crate) fn row_note(
    node: &ContentNode,
    transfer_type: TransferType,
) -> Option<RowNote> {
    if !transfer_type.is_visible(node) {
        Some(RowNote::Unavailable)
    } else if node.total_resources == 0 {
        Some(RowNote::Empty)
    } else if transfer_type.eligible_resources(node) > 0 {
        None
    } else if transfer_type.is_import() {
        Some(RowNote::AlreadyOnDevice)
    } else {
        Some(RowNote::NotOnDevice)
    }
}

/// Children shown for the current transfer type, in their original order
pub fn visible_children(
    children: &[ContentNode],
    transfer_type: TransferType,
) -> Vec<&ContentNode> {
    children
        .iter()
        .filter(|child| transfer_type.is_visible(child))
        .collect()
}

/// Annotate the visible children of `topic`, located at `path`
pub fn annotate_children(
    topic: &ContentNode,
    path: &NodePath,
    children: &[ContentNode],
    store: &SelectionStore,
    transfer_type: TransferType,
) -> Vec<AnnotatedNode> {
    let children_path = path.child(topic.stub());
    visible_children(children, transfer_type)
        .into_iter()
        .map(|child| annotate(child, &children_path, store, transfer_type))
        .collect()
}

/// State of the "select all" checkbox of a topic's listing, which is the
/// topic's own status
pub fn select_all_status(
    topic: &ContentNode,
    path: &NodePath,
    store: &SelectionStore,
) -> CheckboxStatus {
    derive_status(topic, path, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, node, node_ref};
    use crate::node::{NodeRef, PathStub};

    fn status_of(id: &str, store: &SelectionStore) -> CheckboxStatus {
        derive_status(&node(id), &fixtures::path(id), store)
    }

    #[test]
    fn nothing_selected_is_unchecked() {
        let store = SelectionStore::new();
        for id in fixtures::ids() {
            assert_eq!(status_of(id, &store), CheckboxStatus::Unchecked);
        }
    }

    #[test]
    fn included_topic_checks_its_whole_subtree() {
        let mut store = SelectionStore::new();
        store.replace_included(vec![node_ref("topic_1")]);

        assert_eq!(status_of("topic_1", &store), CheckboxStatus::Checked);
        for id in fixtures::descendants("topic_1") {
            assert_eq!(status_of(id, &store), CheckboxStatus::Checked);
        }
        assert_eq!(status_of("topic_2", &store), CheckboxStatus::Unchecked);
        assert_eq!(
            status_of("channel_1", &store),
            CheckboxStatus::Indeterminate
        );
    }

    #[test]
    fn omitted_descendant_makes_topic_indeterminate() {
        let mut store = SelectionStore::new();
        store.replace_included(vec![NodeRef::new("topic_1", NodePath::root())]);
        store.replace_omitted(vec![NodeRef::new(
            "subtopic_1",
            NodePath::new(vec![PathStub::new("topic_1", "")]),
        )]);

        let topic = ContentNode::topic("topic_1", 3);
        let subtopic = ContentNode::topic("subtopic_1", 2);
        assert_eq!(
            derive_status(&topic, &NodePath::root(), &store),
            CheckboxStatus::Indeterminate
        );
        assert_eq!(
            derive_status(
                &subtopic,
                &NodePath::new(vec![PathStub::new("topic_1", "")]),
                &store
            ),
            CheckboxStatus::Unchecked
        );
    }

    #[test]
    fn nearest_entry_overrides_farther_ones() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("channel_1"));
        store.add_exclusion(node_ref("topic_1"));
        store.add_inclusion(node_ref("leaf_a"));

        assert_eq!(status_of("leaf_a", &store), CheckboxStatus::Checked);
        assert_eq!(status_of("leaf_b", &store), CheckboxStatus::Unchecked);
        assert_eq!(
            status_of("subtopic_1", &store),
            CheckboxStatus::Indeterminate
        );
        assert_eq!(status_of("topic_1", &store), CheckboxStatus::Indeterminate);
        assert_eq!(status_of("leaf_e", &store), CheckboxStatus::Checked);
    }

    #[test]
    fn leaves_are_never_indeterminate() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("channel_1"));
        // An ill-formed entry claiming to live below a leaf
        store.replace_omitted(vec![NodeRef::new(
            "ghost",
            fixtures::path("leaf_a").child(PathStub::new("leaf_a", "")),
        )]);
        assert_eq!(status_of("leaf_a", &store), CheckboxStatus::Checked);
    }

    #[test]
    fn annotation_carries_full_path() {
        let store = SelectionStore::new();
        let path = NodePath::new(vec![
            PathStub::new("channel_1", "Channel 1"),
            PathStub::new("topic_1", "Topic 1"),
        ]);
        let mut child = ContentNode::leaf("leaf_1", NodeKind::Video);
        child.title = "Leaf 1".to_owned();

        let annotated =
            annotate(&child, &path, &store, TransferType::RemoteImport);
        assert_eq!(
            annotated.path,
            NodePath::new(vec![
                PathStub::new("channel_1", "Channel 1"),
                PathStub::new("topic_1", "Topic 1"),
                PathStub::new("leaf_1", "Leaf 1"),
            ])
        );
        assert!(!annotated.checked);
        assert!(!annotated.disabled);
    }

    fn children_ab() -> Vec<ContentNode> {
        let mut a = ContentNode::leaf("a", NodeKind::Video);
        a.importable = true;
        a.available = false;
        let mut b = ContentNode::leaf("b", NodeKind::Video);
        b.importable = true;
        b.available = true;
        b.on_device_resources = 1;
        vec![a, b]
    }

    #[test]
    fn visibility_follows_transfer_type() {
        let children = children_ab();
        let ids = |transfer_type: TransferType| -> Vec<String> {
            visible_children(&children, transfer_type)
                .into_iter()
                .map(|n| n.id.to_string())
                .collect()
        };
        assert_eq!(ids(TransferType::RemoteImport), vec!["a", "b"]);
        assert_eq!(ids(TransferType::LocalImport), vec!["a", "b"]);
        assert_eq!(ids(TransferType::LocalExport), vec!["b"]);
    }

    #[test]
    fn local_import_hides_non_importable_children() {
        let mut children = children_ab();
        children[1].importable = false;
        let visible = visible_children(&children, TransferType::LocalImport);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.as_str(), "a");
    }

    #[test]
    fn rows_without_eligible_resources_are_disabled() {
        let store = SelectionStore::new();
        let path = NodePath::root();
        let mut topic = ContentNode::topic("topic", 100);

        topic.on_device_resources = 50;
        let row = annotate(&topic, &path, &store, TransferType::RemoteImport);
        assert!(!row.disabled);

        topic.on_device_resources = 100;
        let row = annotate(&topic, &path, &store, TransferType::RemoteImport);
        assert!(row.disabled);
        assert_eq!(row.note, Some(RowNote::AlreadyOnDevice));

        topic.on_device_resources = 0;
        let row = annotate(&topic, &path, &store, TransferType::LocalExport);
        assert!(row.disabled);
        assert_eq!(row.note, Some(RowNote::NotOnDevice));

        let empty = ContentNode::topic("empty", 0);
        let row = annotate(&empty, &path, &store, TransferType::RemoteImport);
        assert_eq!(row.note, Some(RowNote::Empty));
    }

    #[test]
    fn select_all_follows_topic_status() {
        let topic = node("topic_1");
        let path = fixtures::path("topic_1");

        let mut store = SelectionStore::new();
        assert_eq!(
            select_all_status(&topic, &path, &store),
            CheckboxStatus::Unchecked
        );

        store.replace_included(vec![node_ref("channel_1")]);
        assert_eq!(
            select_all_status(&topic, &path, &store),
            CheckboxStatus::Checked
        );

        store.replace_included(vec![node_ref("topic_1")]);
        assert_eq!(
            select_all_status(&topic, &path, &store),
            CheckboxStatus::Checked
        );

        store.replace_omitted(vec![node_ref("subtopic_1")]);
        assert_eq!(
            select_all_status(&topic, &path, &store),
            CheckboxStatus::Indeterminate
        );
    }

    #[test]
    fn children_are_annotated_below_topic() {
        let mut store = SelectionStore::new();
        store.add_inclusion(node_ref("leaf_a"));

        let children: Vec<ContentNode> = fixtures::children("topic_1")
            .into_iter()
            .map(node)
            .collect();
        let rows = annotate_children(
            &node("topic_1"),
            &fixtures::path("topic_1"),
            &children,
            &store,
            TransferType::RemoteImport,
        );

        let statuses: Vec<(String, CheckboxStatus)> = rows
            .iter()
            .map(|row| (row.id.to_string(), row.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("subtopic_1".to_owned(), CheckboxStatus::Indeterminate),
                ("subtopic_2".to_owned(), CheckboxStatus::Unchecked),
                ("leaf_d".to_owned(), CheckboxStatus::Unchecked),
            ]
        );
        assert_eq!(rows[0].path, fixtures::path("leaf_a"));
    }
}
