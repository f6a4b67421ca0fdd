use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::node::{
    ChannelMetadata, ContentNode, NodeId, NodeKind, NodePath, PathStub,
};
use crate::wizard::{ChannelQuery, ContentProvider, TopicContents};
use crate::{Result, TransferError};

/// Catalog file layout. Only leaves carry state, topic counts and flags
/// are derived from their descendants.
#[derive(Deserialize)]
struct CatalogFile {
    channels: Vec<CatalogChannel>,
    /// Channel ids present on each attached drive
    #[serde(default)]
    drives: HashMap<String, Vec<NodeId>>,
}

#[derive(Deserialize)]
struct CatalogChannel {
    id: NodeId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    version: u32,
    root: CatalogNode,
}

#[derive(Deserialize)]
struct CatalogNode {
    id: NodeId,
    #[serde(default)]
    title: String,
    kind: NodeKind,
    #[serde(default)]
    on_device: bool,
    #[serde(default)]
    available: Option<bool>,
    #[serde(default)]
    importable: Option<bool>,
    #[serde(default)]
    children: Vec<CatalogNode>,
}

struct IndexedNode {
    node: ContentNode,
    channel: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Content provider serving a catalog loaded from a JSON file
pub struct JsonCatalog {
    channels: Vec<ChannelMetadata>,
    drives: HashMap<String, Vec<NodeId>>,
    nodes: HashMap<NodeId, IndexedNode>,
}

impl JsonCatalog {
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        log::info!(
            "catalog: {} channels, {} nodes from {}",
            catalog.channels.len(),
            catalog.nodes.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let mut catalog = JsonCatalog {
            channels: Vec::with_capacity(file.channels.len()),
            drives: file.drives,
            nodes: HashMap::new(),
        };
        for channel in file.channels {
            let root = catalog.index(channel.root, None, &channel.id)?;
            catalog.channels.push(ChannelMetadata {
                id: channel.id,
                name: channel.name,
                description: channel.description,
                root: root.id,
                total_resources: root.total_resources,
                on_device_resources: root.on_device_resources,
                version: channel.version,
            });
        }
        Ok(catalog)
    }

    pub fn node(&self, id: &NodeId) -> Option<&ContentNode> {
        self.nodes.get(id).map(|indexed| &indexed.node)
    }

    /// Index `entry` and its subtree, returning the node with its counts
    fn index(
        &mut self,
        entry: CatalogNode,
        parent: Option<&NodeId>,
        channel: &NodeId,
    ) -> Result<ContentNode> {
        if self.nodes.contains_key(&entry.id) {
            return Err(TransferError::Other(anyhow::anyhow!(
                "duplicate node id {}",
                entry.id
            )));
        }

        let mut node = ContentNode {
            title: entry.title,
            kind: entry.kind,
            total_resources: 1,
            on_device_resources: u64::from(entry.on_device),
            available: entry.available.unwrap_or(true),
            importable: entry.importable.unwrap_or(true),
            id: entry.id,
        };

        let mut children = Vec::with_capacity(entry.children.len());
        if entry.kind.is_topic() {
            let mut computed = Vec::with_capacity(entry.children.len());
            for child in entry.children {
                computed.push(self.index(child, Some(&node.id), channel)?);
            }
            node.total_resources =
                computed.iter().map(|c| c.total_resources).sum();
            node.on_device_resources =
                computed.iter().map(|c| c.on_device_resources).sum();
            if entry.available.is_none() {
                node.available = computed.iter().any(|c| c.available);
            }
            if entry.importable.is_none() {
                node.importable = computed.iter().any(|c| c.importable);
            }
            children = computed.into_iter().map(|c| c.id).collect();
        }

        self.nodes.insert(
            node.id.clone(),
            IndexedNode {
                node: node.clone(),
                channel: channel.clone(),
                parent: parent.cloned(),
                children,
            },
        );
        Ok(node)
    }

    fn lookup(
        &self,
        channel_id: &NodeId,
        node_id: &NodeId,
    ) -> Result<&IndexedNode> {
        match self.nodes.get(node_id) {
            Some(indexed) if &indexed.channel == channel_id => Ok(indexed),
            _ => Err(TransferError::NotFound(format!(
                "{} in channel {}",
                node_id, channel_id
            ))),
        }
    }

    fn on_drive(&self, drive_id: &str, channel_id: &NodeId) -> Result<bool> {
        self.drives
            .get(drive_id)
            .map(|channels| channels.contains(channel_id))
            .ok_or_else(|| {
                TransferError::NotFound(format!("drive {}", drive_id))
            })
    }
}

#[async_trait]
impl ContentProvider for JsonCatalog {
    async fn channels(
        &self,
        query: &ChannelQuery,
    ) -> Result<Vec<ChannelMetadata>> {
        let mut listed = Vec::new();
        for channel in &self.channels {
            if query.for_export && channel.on_device_resources == 0 {
                continue;
            }
            if let Some(drive) = &query.drive_id {
                if !query.for_export && !self.on_drive(drive, &channel.id)? {
                    continue;
                }
            }
            listed.push(channel.clone());
        }
        log::debug!("catalog: {} channels match {:?}", listed.len(), query);
        Ok(listed)
    }

    async fn channel(
        &self,
        channel_id: &NodeId,
        drive_id: Option<&str>,
    ) -> Result<ChannelMetadata> {
        let channel = self
            .channels
            .iter()
            .find(|channel| &channel.id == channel_id)
            .ok_or_else(|| {
                TransferError::NotFound(format!("channel {}", channel_id))
            })?;
        if let Some(drive) = drive_id {
            if !self.on_drive(drive, channel_id)? {
                return Err(TransferError::NotFound(format!(
                    "channel {} on drive {}",
                    channel_id, drive
                )));
            }
        }
        Ok(channel.clone())
    }

    async fn topic(
        &self,
        channel_id: &NodeId,
        topic_id: &NodeId,
    ) -> Result<TopicContents> {
        let indexed = self.lookup(channel_id, topic_id)?;
        let children = indexed
            .children
            .iter()
            .filter_map(|id| self.node(id).cloned())
            .collect();
        Ok(TopicContents {
            node: indexed.node.clone(),
            children,
        })
    }

    async fn ancestors(
        &self,
        channel_id: &NodeId,
        node_id: &NodeId,
    ) -> Result<NodePath> {
        let mut stubs = Vec::new();
        let mut current = self.lookup(channel_id, node_id)?.parent.as_ref();
        while let Some(id) = current {
            let indexed = self.lookup(channel_id, id)?;
            stubs.push(PathStub::new(id.clone(), indexed.node.title.clone()));
            current = indexed.parent.as_ref();
        }
        stubs.reverse();
        Ok(NodePath::new(stubs))
    }
}
