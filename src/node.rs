use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a content node, unique within a transfer session
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId(value)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Root topic of a channel
    Channel,
    Topic,
    Video,
    Audio,
    Document,
    Exercise,
    Html5,
}

/// Icon shown next to a row, one per kind of content
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug)]
pub enum ContentIcon {
    Channel,
    Folder,
    Video,
    Audio,
    Document,
    Exercise,
    Interactive,
}

impl NodeKind {
    /// Containers may have children, everything else is a resource
    pub fn is_topic(&self) -> bool {
        matches!(self, NodeKind::Channel | NodeKind::Topic)
    }

    pub fn icon(&self) -> ContentIcon {
        match self {
            NodeKind::Channel => ContentIcon::Channel,
            NodeKind::Topic => ContentIcon::Folder,
            NodeKind::Video => ContentIcon::Video,
            NodeKind::Audio => ContentIcon::Audio,
            NodeKind::Document => ContentIcon::Document,
            NodeKind::Exercise => ContentIcon::Exercise,
            NodeKind::Html5 => ContentIcon::Interactive,
        }
    }
}

/// A single ancestor in a [`NodePath`]
#[derive(Eq, PartialEq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct PathStub {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
}

impl PathStub {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        PathStub {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Ancestors of a node, ordered from the tree root down to the
/// immediate parent. The node itself is never part of its own path.
#[derive(Eq, PartialEq, Hash, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<PathStub>);

impl NodePath {
    pub fn new(stubs: Vec<PathStub>) -> Self {
        NodePath(stubs)
    }

    pub fn root() -> Self {
        NodePath(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn stubs(&self) -> &[PathStub] {
        &self.0
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.0.iter().any(|stub| &stub.id == id)
    }

    /// Path of a child of the node with the given stub
    pub fn child(&self, stub: PathStub) -> Self {
        let mut stubs = self.0.clone();
        stubs.push(stub);
        NodePath(stubs)
    }

    /// Ancestor ids from the immediate parent up to the root
    pub fn ids_nearest_first(&self) -> impl Iterator<Item = &NodeId> {
        self.0.iter().rev().map(|stub| &stub.id)
    }
}

impl FromIterator<PathStub> for NodePath {
    fn from_iter<I: IntoIterator<Item = PathStub>>(iter: I) -> Self {
        NodePath(iter.into_iter().collect())
    }
}

/// A content node as served by the metadata provider.
///
/// Nodes are snapshots: the engine never mutates them, it only records
/// their ids in the selection sets.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    pub kind: NodeKind,
    /// Leaf descendants, `1` for a leaf itself
    pub total_resources: u64,
    /// Leaf descendants already present at the destination
    #[serde(default)]
    pub on_device_resources: u64,
    /// Whether the source can currently serve this node
    #[serde(default = "default_true")]
    pub available: bool,
    /// Whether the node is eligible for the current transfer direction
    #[serde(default = "default_true")]
    pub importable: bool,
}

fn default_true() -> bool {
    true
}

impl ContentNode {
    pub fn topic(id: impl Into<NodeId>, total_resources: u64) -> Self {
        Self::new(id, NodeKind::Topic, total_resources)
    }

    pub fn leaf(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self::new(id, kind, 1)
    }

    fn new(
        id: impl Into<NodeId>,
        kind: NodeKind,
        total_resources: u64,
    ) -> Self {
        let id = id.into();
        ContentNode {
            title: id.to_string(),
            id,
            kind,
            total_resources,
            on_device_resources: 0,
            available: true,
            importable: true,
        }
    }

    pub fn is_topic(&self) -> bool {
        self.kind.is_topic()
    }

    pub fn stub(&self) -> PathStub {
        PathStub::new(self.id.clone(), self.title.clone())
    }
}

/// Entry of a selection set: a node id together with its ancestors
#[derive(Eq, PartialEq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: NodeId,
    #[serde(default)]
    pub path: NodePath,
}

impl NodeRef {
    pub fn new(id: impl Into<NodeId>, path: NodePath) -> Self {
        NodeRef {
            id: id.into(),
            path,
        }
    }

    pub fn of(node: &ContentNode, path: &NodePath) -> Self {
        NodeRef::new(node.id.clone(), path.clone())
    }

    /// True if `ancestor` lies on this entry's path
    pub fn is_descendant_of(&self, ancestor: &NodeId) -> bool {
        self.path.contains(ancestor)
    }
}

/// Channel summary shown on the available-channels page
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Id of the channel's root topic
    pub root: NodeId,
    pub total_resources: u64,
    #[serde(default)]
    pub on_device_resources: u64,
    #[serde(default)]
    pub version: u32,
}

impl ChannelMetadata {
    /// The channel's root topic as a browsable node
    pub fn root_node(&self) -> ContentNode {
        ContentNode {
            id: self.root.clone(),
            title: self.name.clone(),
            kind: NodeKind::Channel,
            total_resources: self.total_resources,
            on_device_resources: self.on_device_resources,
            available: self.on_device_resources > 0,
            importable: true,
        }
    }
}
