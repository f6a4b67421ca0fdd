use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use uuid::Uuid;

use crate::node::{ChannelMetadata, ContentNode, NodeId, NodePath};
use crate::transfer::TransferType;
use crate::wizard::provider::{
    ChannelQuery, ContentProvider, ErrorSink, Navigator, TopicContents,
};
use crate::wizard::state::{WizardContext, WizardPage, WizardState};
use crate::{Result, TransferError};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum PseudoTransition {
    Backward,
    Cancel,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportSource {
    Network,
    LocalDrive,
}

/// A topic handed over by the page that links to it
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct TopicTarget {
    pub node: ContentNode,
    /// Ancestors of `node`
    pub path: NodePath,
}

/// Named routes of the transfer wizard
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum Transition {
    OpenImport,
    OpenExport,
    ChooseImportSource(ImportSource),
    GotoAvailableChannelsPage,
    AvailableChannelsDirectly {
        for_export: bool,
        drive_id: Option<String>,
    },
    LoadingChannelMetadata {
        channel_id: NodeId,
    },
    SelectContentDirectly {
        channel_id: NodeId,
        drive_id: Option<String>,
        for_export: bool,
    },
    GotoTopicTreeview {
        node_id: NodeId,
        node: Option<TopicTarget>,
    },
    SelectContentTopic {
        channel_id: NodeId,
        node_id: NodeId,
        node: Option<TopicTarget>,
        drive_id: Option<String>,
        for_export: bool,
    },
    Wizard(PseudoTransition),
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum NavigationRequest {
    /// Leave the wizard for the content catalog
    CatalogRoot,
    Transition(Transition),
}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Outcome {
    Applied,
    /// A guard failed and the navigator was asked to go elsewhere
    Redirected,
    /// The transition has no effect from the current page
    Ignored,
    /// The fetched data arrived after a newer transition
    Discarded,
    /// The fetch failed and the wizard was reset
    Failed,
}

#[derive(Eq, PartialEq, Clone, Debug)]
enum FetchRequest {
    Channels {
        query: ChannelQuery,
        transfer_type: TransferType,
    },
    Channel {
        channel_id: NodeId,
        drive_id: Option<String>,
        transfer_type: TransferType,
    },
    Topic {
        channel_id: NodeId,
        node_id: NodeId,
        /// Ancestors of the topic, queried from the provider when unknown
        path: Option<NodePath>,
    },
}

/// Metadata a transition waits on
#[derive(Debug)]
pub enum Fetched {
    Channels(Vec<ChannelMetadata>),
    Channel {
        channel: ChannelMetadata,
        root: TopicContents,
    },
    Topic {
        contents: TopicContents,
        path: NodePath,
    },
}

/// The asynchronous half of a transition. It borrows nothing from the
/// wizard context, so the context stays usable while the fetch runs.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct PendingFetch {
    generation: u64,
    expected_page: Option<WizardPage>,
    request: FetchRequest,
}

impl PendingFetch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Short description used when reporting a failure
    pub fn context(&self) -> String {
        match &self.request {
            FetchRequest::Channels { query, .. } => match &query.drive_id {
                Some(drive) => format!("channels on drive {}", drive),
                None => "available channels".to_owned(),
            },
            FetchRequest::Channel { channel_id, .. } => {
                format!("channel {}", channel_id)
            }
            FetchRequest::Topic { node_id, .. } => {
                format!("topic {}", node_id)
            }
        }
    }
}

pub enum Step {
    Done(Outcome),
    Fetch(PendingFetch),
}

pub struct Router {
    provider: Arc<dyn ContentProvider>,
    errors: Arc<dyn ErrorSink>,
    navigator: Arc<dyn Navigator>,
    fetch_timeout: Duration,
}

impl Router {
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        errors: Arc<dyn ErrorSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Router {
            provider,
            errors,
            navigator,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Run a transition to completion
    pub async fn navigate(
        &self,
        ctx: &mut WizardContext,
        transition: Transition,
    ) -> Outcome {
        match self.begin(ctx, transition) {
            Step::Done(outcome) => outcome,
            Step::Fetch(pending) => {
                let result = self.fetch(&pending).await;
                self.complete(ctx, pending, result)
            }
        }
    }

    /// Check the transition's guard and apply everything that does not
    /// need fresh metadata. A transition that applies or issues a fetch
    /// supersedes fetches begun earlier. Redirects and ignored transitions
    /// leave them running.
    pub fn begin(
        &self,
        ctx: &mut WizardContext,
        transition: Transition,
    ) -> Step {
        log::debug!(
            "router: {:?} from page {:?}",
            transition,
            ctx.wizard.page
        );
        let page = ctx.wizard.page;

        let request = match transition {
            Transition::OpenImport => {
                supersede(ctx);
                ctx.reset();
                ctx.wizard =
                    WizardState::open(WizardPage::SelectImportSource, None);
                return Step::Done(Outcome::Applied);
            }
            Transition::OpenExport => {
                supersede(ctx);
                ctx.reset();
                ctx.wizard = WizardState::open(
                    WizardPage::SelectDrive,
                    Some(TransferType::LocalExport),
                );
                return Step::Done(Outcome::Applied);
            }
            Transition::ChooseImportSource(source) => {
                if page != Some(WizardPage::SelectImportSource) {
                    return self.redirect(NavigationRequest::CatalogRoot);
                }
                match source {
                    ImportSource::Network => channels_request(false, None),
                    ImportSource::LocalDrive => {
                        supersede(ctx);
                        ctx.wizard.page = Some(WizardPage::SelectDrive);
                        ctx.wizard.transfer_type =
                            Some(TransferType::LocalImport);
                        return Step::Done(Outcome::Applied);
                    }
                }
            }
            Transition::GotoAvailableChannelsPage => match page {
                None => return self.redirect(NavigationRequest::CatalogRoot),
                Some(
                    WizardPage::SelectContent
                    | WizardPage::LoadingChannelMetadata,
                ) => return self.backward(ctx),
                // Already there, or no source or drive chosen yet
                Some(
                    WizardPage::AvailableChannels
                    | WizardPage::SelectImportSource
                    | WizardPage::SelectDrive,
                ) => return Step::Done(Outcome::Ignored),
            },
            Transition::AvailableChannelsDirectly {
                for_export,
                drive_id,
            } => channels_request(for_export, drive_id),
            Transition::LoadingChannelMetadata { channel_id } => {
                if !matches!(
                    page,
                    Some(
                        WizardPage::AvailableChannels
                            | WizardPage::LoadingChannelMetadata
                    )
                ) {
                    return self.redirect(NavigationRequest::CatalogRoot);
                }
                ctx.wizard.page = Some(WizardPage::LoadingChannelMetadata);
                FetchRequest::Channel {
                    channel_id,
                    drive_id: ctx.wizard.drive_id.clone(),
                    transfer_type: ctx
                        .wizard
                        .transfer_type
                        .unwrap_or(TransferType::RemoteImport),
                }
            }
            Transition::SelectContentDirectly {
                channel_id,
                drive_id,
                for_export,
            } => FetchRequest::Channel {
                transfer_type: TransferType::from_source(
                    for_export,
                    drive_id.as_deref(),
                ),
                channel_id,
                drive_id,
            },
            Transition::GotoTopicTreeview { node_id, node } => {
                let channel_id = match (&ctx.wizard.page, &ctx.wizard.channel)
                {
                    (Some(WizardPage::SelectContent), Some(channel)) => {
                        channel.id.clone()
                    }
                    _ => return self.redirect(NavigationRequest::CatalogRoot),
                };
                topic_request(&ctx.wizard, channel_id, node_id, node)
            }
            Transition::SelectContentTopic {
                channel_id,
                node_id,
                node,
                drive_id,
                for_export,
            } => {
                let browsing = ctx.wizard.transfer_type.is_some()
                    && ctx
                        .wizard
                        .channel
                        .as_ref()
                        .map(|channel| channel.id == channel_id)
                        .unwrap_or(false);
                if !browsing {
                    return self.redirect(NavigationRequest::Transition(
                        Transition::SelectContentDirectly {
                            channel_id,
                            drive_id,
                            for_export,
                        },
                    ));
                }
                topic_request(&ctx.wizard, channel_id, node_id, node)
            }
            Transition::Wizard(PseudoTransition::Cancel) => {
                return self.cancel(ctx)
            }
            Transition::Wizard(PseudoTransition::Backward) => {
                return self.backward(ctx)
            }
        };

        Step::Fetch(self.pending(ctx, request))
    }

    pub async fn fetch(&self, pending: &PendingFetch) -> Result<Fetched> {
        log::debug!("router: fetching {}", pending.context());
        match timeout(self.fetch_timeout, self.run(&pending.request)).await {
            Ok(result) => result,
            Err(_) => Err(TransferError::Timeout(pending.context())),
        }
    }

    async fn run(&self, request: &FetchRequest) -> Result<Fetched> {
        match request {
            FetchRequest::Channels { query, .. } => {
                let channels = self.provider.channels(query).await?;
                Ok(Fetched::Channels(channels))
            }
            FetchRequest::Channel {
                channel_id,
                drive_id,
                ..
            } => {
                let channel = self
                    .provider
                    .channel(channel_id, drive_id.as_deref())
                    .await?;
                let root =
                    self.provider.topic(channel_id, &channel.root).await?;
                Ok(Fetched::Channel { channel, root })
            }
            FetchRequest::Topic {
                channel_id,
                node_id,
                path,
            } => {
                let contents = self.provider.topic(channel_id, node_id).await?;
                let path = match path {
                    Some(path) => path.clone(),
                    None => self.provider.ancestors(channel_id, node_id).await?,
                };
                Ok(Fetched::Topic { contents, path })
            }
        }
    }

    /// Apply the result of `pending` unless a newer transition took over
    pub fn complete(
        &self,
        ctx: &mut WizardContext,
        pending: PendingFetch,
        result: Result<Fetched>,
    ) -> Outcome {
        if pending.generation != ctx.generation() {
            log::debug!(
                "router: discarding {} from generation {}",
                pending.context(),
                pending.generation
            );
            return Outcome::Discarded;
        }

        let fetched = match result {
            Ok(fetched) => fetched,
            Err(error) => {
                self.errors.report(&pending.context(), &error);
                ctx.reset();
                return Outcome::Failed;
            }
        };
        ctx.page_loading = false;

        if ctx.wizard.page != pending.expected_page {
            log::debug!(
                "router: page moved to {:?}, dropping {}",
                ctx.wizard.page,
                pending.context()
            );
            return Outcome::Discarded;
        }

        let mut wizard = std::mem::take(&mut ctx.wizard);
        if wizard.id.is_none() {
            wizard.id = Some(Uuid::new_v4());
        }
        match (pending.request, fetched) {
            (
                FetchRequest::Channels {
                    query,
                    transfer_type,
                },
                Fetched::Channels(channels),
            ) => {
                log::info!("router: {} channels available", channels.len());
                wizard.page = Some(WizardPage::AvailableChannels);
                wizard.transfer_type = Some(transfer_type);
                wizard.drive_id = query.drive_id;
                wizard.available_channels = channels;
                wizard.channel = None;
                wizard.current_topic = None;
                wizard.path = NodePath::root();
                wizard.path_cache.clear();
            }
            (
                FetchRequest::Channel {
                    drive_id,
                    transfer_type,
                    ..
                },
                Fetched::Channel { channel, root },
            ) => {
                let same_channel = wizard
                    .channel
                    .as_ref()
                    .map(|current| current.id == channel.id)
                    .unwrap_or(false);
                if !same_channel {
                    ctx.selection.clear();
                    wizard.path_cache.clear();
                }
                log::info!("router: browsing channel {}", channel.id);
                wizard.page = Some(WizardPage::SelectContent);
                wizard.transfer_type = Some(transfer_type);
                wizard.drive_id = drive_id;
                wizard.channel = Some(channel);
                wizard.enter_topic(root, NodePath::root());
            }
            (FetchRequest::Topic { .. }, Fetched::Topic { contents, path }) => {
                wizard.page = Some(WizardPage::SelectContent);
                wizard.enter_topic(contents, path);
            }
            (request, fetched) => {
                log::warn!(
                    "router: {:?} does not answer {:?}",
                    fetched,
                    request
                );
                ctx.wizard = wizard;
                return Outcome::Discarded;
            }
        }
        ctx.wizard = wizard;
        Outcome::Applied
    }

    fn pending(
        &self,
        ctx: &mut WizardContext,
        request: FetchRequest,
    ) -> PendingFetch {
        let generation = supersede(ctx);
        ctx.page_loading = true;
        PendingFetch {
            generation,
            expected_page: ctx.wizard.page,
            request,
        }
    }

    fn backward(&self, ctx: &mut WizardContext) -> Step {
        let Some(page) = ctx.wizard.page else {
            return Step::Done(Outcome::Ignored);
        };
        let transfer_type = ctx.wizard.transfer_type;
        supersede(ctx);
        match page {
            WizardPage::SelectContent | WizardPage::LoadingChannelMetadata => {
                if ctx.wizard.available_channels.is_empty() {
                    let request = wizard_channels_request(&ctx.wizard);
                    return Step::Fetch(self.pending(ctx, request));
                }
                let wizard = &mut ctx.wizard;
                wizard.page = Some(WizardPage::AvailableChannels);
                wizard.channel = None;
                wizard.current_topic = None;
                wizard.path = NodePath::root();
                Step::Done(Outcome::Applied)
            }
            WizardPage::AvailableChannels => {
                let wizard = &mut ctx.wizard;
                wizard.available_channels.clear();
                match transfer_type {
                    Some(
                        TransferType::LocalImport | TransferType::LocalExport,
                    ) => {
                        wizard.page = Some(WizardPage::SelectDrive);
                        wizard.drive_id = None;
                    }
                    _ => {
                        wizard.page = Some(WizardPage::SelectImportSource);
                        wizard.transfer_type = None;
                    }
                }
                Step::Done(Outcome::Applied)
            }
            WizardPage::SelectDrive
                if transfer_type != Some(TransferType::LocalExport) =>
            {
                let wizard = &mut ctx.wizard;
                wizard.page = Some(WizardPage::SelectImportSource);
                wizard.transfer_type = None;
                wizard.drive_id = None;
                Step::Done(Outcome::Applied)
            }
            WizardPage::SelectDrive | WizardPage::SelectImportSource => {
                self.cancel(ctx)
            }
        }
    }

    fn cancel(&self, ctx: &mut WizardContext) -> Step {
        supersede(ctx);
        ctx.reset();
        self.navigator.request(NavigationRequest::CatalogRoot);
        Step::Done(Outcome::Applied)
    }

    fn redirect(&self, request: NavigationRequest) -> Step {
        log::info!("router: redirecting to {:?}", request);
        self.navigator.request(request);
        Step::Done(Outcome::Redirected)
    }
}

/// Claim a new generation so that fetches begun earlier are discarded
fn supersede(ctx: &mut WizardContext) -> u64 {
    ctx.page_loading = false;
    ctx.next_generation()
}

fn channels_request(
    for_export: bool,
    drive_id: Option<String>,
) -> FetchRequest {
    FetchRequest::Channels {
        transfer_type: TransferType::from_source(
            for_export,
            drive_id.as_deref(),
        ),
        query: ChannelQuery {
            for_export,
            drive_id,
        },
    }
}

/// Channel list for the transfer the wizard is already set up for
fn wizard_channels_request(wizard: &WizardState) -> FetchRequest {
    let for_export = wizard.transfer_type == Some(TransferType::LocalExport);
    let drive_id = wizard.drive_id.clone();
    FetchRequest::Channels {
        transfer_type: wizard.transfer_type.unwrap_or_else(|| {
            TransferType::from_source(for_export, drive_id.as_deref())
        }),
        query: ChannelQuery {
            for_export,
            drive_id,
        },
    }
}

fn topic_request(
    wizard: &WizardState,
    channel_id: NodeId,
    node_id: NodeId,
    node: Option<TopicTarget>,
) -> FetchRequest {
    let path = match node {
        Some(target) => Some(target.path),
        None => wizard.path_cache.get(&node_id).cloned(),
    };
    FetchRequest::Topic {
        channel_id,
        node_id,
        path,
    }
}
