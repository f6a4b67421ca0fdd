//! A small content tree shared by the unit tests:
//!
//! ```text
//! channel_1
//! ├── topic_1
//! │   ├── subtopic_1
//! │   │   ├── leaf_a
//! │   │   └── leaf_b
//! │   ├── subtopic_2
//! │   │   └── leaf_c
//! │   └── leaf_d
//! └── topic_2
//!     └── leaf_e
//! ```
use crate::node::{ContentNode, NodeKind, NodePath, NodeRef, PathStub};

const TREE: &[(&str, Option<&str>)] = &[
    ("channel_1", None),
    ("topic_1", Some("channel_1")),
    ("subtopic_1", Some("topic_1")),
    ("leaf_a", Some("subtopic_1")),
    ("leaf_b", Some("subtopic_1")),
    ("subtopic_2", Some("topic_1")),
    ("leaf_c", Some("subtopic_2")),
    ("leaf_d", Some("topic_1")),
    ("topic_2", Some("channel_1")),
    ("leaf_e", Some("topic_2")),
];

pub fn ids() -> Vec<&'static str> {
    TREE.iter().map(|(id, _)| *id).collect()
}

fn parent(id: &str) -> Option<&'static str> {
    TREE.iter()
        .find(|(node, _)| *node == id)
        .and_then(|(_, parent)| *parent)
}

pub fn children(id: &str) -> Vec<&'static str> {
    TREE.iter()
        .filter(|(_, parent)| *parent == Some(id))
        .map(|(node, _)| *node)
        .collect()
}

pub fn descendants(id: &str) -> Vec<&'static str> {
    let mut all = Vec::new();
    for child in children(id) {
        all.push(child);
        all.extend(descendants(child));
    }
    all
}

fn leaves_under(id: &str) -> u64 {
    let children = children(id);
    if children.is_empty() {
        1
    } else {
        children.iter().map(|child| leaves_under(child)).sum()
    }
}

pub fn node(id: &str) -> ContentNode {
    let kind = if id == "channel_1" {
        NodeKind::Channel
    } else if id.starts_with("leaf") {
        NodeKind::Video
    } else {
        NodeKind::Topic
    };
    ContentNode {
        id: id.into(),
        title: format!("Title of {}", id),
        kind,
        total_resources: leaves_under(id),
        on_device_resources: 0,
        available: true,
        importable: true,
    }
}

pub fn path(id: &str) -> NodePath {
    let mut stubs = Vec::new();
    let mut current = parent(id);
    while let Some(ancestor) = current {
        stubs.push(PathStub::new(ancestor, format!("Title of {}", ancestor)));
        current = parent(ancestor);
    }
    stubs.reverse();
    NodePath::new(stubs)
}

pub fn node_ref(id: &str) -> NodeRef {
    NodeRef::new(id, path(id))
}
