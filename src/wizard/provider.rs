use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::node::{ChannelMetadata, ContentNode, NodeId, NodePath};
use crate::wizard::router::NavigationRequest;
use crate::{Result, TransferError};

/// Which channels to list
#[derive(Eq, PartialEq, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChannelQuery {
    pub for_export: bool,
    pub drive_id: Option<String>,
}

/// A topic together with its direct children
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct TopicContents {
    pub node: ContentNode,
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

/// Source of channel and topic metadata
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn channels(
        &self,
        query: &ChannelQuery,
    ) -> Result<Vec<ChannelMetadata>>;

    async fn channel(
        &self,
        channel_id: &NodeId,
        drive_id: Option<&str>,
    ) -> Result<ChannelMetadata>;

    async fn topic(
        &self,
        channel_id: &NodeId,
        topic_id: &NodeId,
    ) -> Result<TopicContents>;

    /// Ancestors of `node_id`, from the channel root down to its parent
    async fn ancestors(
        &self,
        channel_id: &NodeId,
        node_id: &NodeId,
    ) -> Result<NodePath>;
}

/// Where failures of asynchronous work are surfaced to the user
pub trait ErrorSink: Send + Sync {
    fn report(&self, context: &str, error: &TransferError);
}

pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&self, context: &str, error: &TransferError) {
        log::error!("{}: {}", context, error);
    }
}

/// Accepts requests to move to another named route
pub trait Navigator: Send + Sync {
    fn request(&self, request: NavigationRequest);
}

/// Navigator for callers that drive transitions themselves
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn request(&self, request: NavigationRequest) {
        log::debug!("navigator: ignoring {:?}", request);
    }
}
