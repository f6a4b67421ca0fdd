use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::annotate::{
    annotate_children, row_note, select_all_status, AnnotatedNode,
    CheckboxStatus,
};
use crate::node::{ChannelMetadata, NodeId, NodePath};
use crate::selection::SelectionStore;
use crate::toggle::{toggle, ToggleAction};
use crate::transfer::TransferType;
use crate::wizard::provider::TopicContents;

/// Steps of the transfer wizard
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardPage {
    SelectImportSource,
    SelectDrive,
    AvailableChannels,
    LoadingChannelMetadata,
    SelectContent,
}

/// Everything the wizard shows. The default value is the initial shape:
/// no page and no transfer in progress.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardState {
    pub id: Option<Uuid>,
    pub page: Option<WizardPage>,
    pub transfer_type: Option<TransferType>,
    pub drive_id: Option<String>,
    pub available_channels: Vec<ChannelMetadata>,
    pub channel: Option<ChannelMetadata>,
    /// The topic whose children are being browsed
    pub current_topic: Option<TopicContents>,
    /// Ancestors of the current topic
    pub path: NodePath,
    /// Known ancestors of every node seen so far, to rebuild the path of a
    /// topic that is only referred to by id
    pub path_cache: HashMap<NodeId, NodePath>,
}

impl WizardState {
    pub fn open(page: WizardPage, transfer_type: Option<TransferType>) -> Self {
        WizardState {
            id: Some(Uuid::new_v4()),
            page: Some(page),
            transfer_type,
            ..Default::default()
        }
    }

    pub fn is_initial(&self) -> bool {
        self == &WizardState::default()
    }

    /// Path shared by the children of the current topic
    pub fn children_path(&self) -> Option<NodePath> {
        self.current_topic
            .as_ref()
            .map(|topic| self.path.child(topic.node.stub()))
    }

    /// Make `topic` the current topic and remember where its children
    /// live.
    pub(crate) fn enter_topic(&mut self, topic: TopicContents, path: NodePath) {
        let children_path = path.child(topic.node.stub());
        self.path_cache.insert(topic.node.id.clone(), path.clone());
        for child in topic.children.iter().filter(|c| c.is_topic()) {
            self.path_cache
                .insert(child.id.clone(), children_path.clone());
        }
        self.current_topic = Some(topic);
        self.path = path;
    }
}

/// Single owner of the wizard state and the selection it edits
#[derive(Debug, Default)]
pub struct WizardContext {
    pub wizard: WizardState,
    pub selection: SelectionStore,
    /// True while a transition waits on a metadata fetch
    pub page_loading: bool,
    generation: u64,
}

impl WizardContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any transfer in progress
    pub fn reset(&mut self) {
        self.wizard = WizardState::default();
        self.selection.clear();
        self.page_loading = false;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn transfer_type(&self) -> TransferType {
        self.wizard
            .transfer_type
            .unwrap_or(TransferType::RemoteImport)
    }

    /// Annotated rows of the current topic's visible children
    pub fn rows(&self) -> Vec<AnnotatedNode> {
        match &self.wizard.current_topic {
            Some(topic) => annotate_children(
                &topic.node,
                &self.wizard.path,
                &topic.children,
                &self.selection,
                self.transfer_type(),
            ),
            None => Vec::new(),
        }
    }

    pub fn select_all_status(&self) -> Option<CheckboxStatus> {
        self.wizard.current_topic.as_ref().map(|topic| {
            select_all_status(&topic.node, &self.wizard.path, &self.selection)
        })
    }

    /// Toggle the "select all" checkbox of the current topic
    pub fn toggle_all(&mut self) -> Option<ToggleAction> {
        let topic = self.wizard.current_topic.as_ref()?;
        Some(toggle(&topic.node, &self.wizard.path, &mut self.selection))
    }

    /// Toggle one child of the current topic. Hidden and disabled rows
    /// are refused.
    pub fn toggle_child(&mut self, id: &NodeId) -> Option<ToggleAction> {
        let transfer_type = self.transfer_type();
        let path = self.wizard.children_path()?;
        let topic = self.wizard.current_topic.as_ref()?;
        let child = topic.children.iter().find(|child| &child.id == id)?;
        if let Some(note) = row_note(child, transfer_type) {
            log::debug!("wizard: {} cannot be selected ({:?})", id, note);
            return None;
        }
        Some(toggle(child, &path, &mut self.selection))
    }
}
