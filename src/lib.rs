//! Selection of content subtrees for bulk transfer.
//!
//! A selection is kept as two compact sets, subtrees that are included and
//! descendants carved out of them, and the status of every node is derived
//! from the nearest entry among its ancestors. The [`wizard`] module drives
//! the pages a user goes through to reach the content being selected.

pub mod annotate;
pub mod catalog;
pub mod config;
mod errors;
pub mod node;
pub mod selection;
pub mod session;
pub mod toggle;
pub mod transfer;
pub mod wizard;

#[cfg(test)]
mod fixtures;

pub use annotate::{
    annotate, annotate_children, derive_status, select_all_status,
    visible_children, AnnotatedNode, CheckboxStatus, RowNote,
};
pub use errors::{Result, TransferError};
pub use node::{
    ChannelMetadata, ContentIcon, ContentNode, NodeId, NodeKind, NodePath,
    NodeRef, PathStub,
};
pub use selection::{SelectionSet, SelectionStore};
pub use toggle::{toggle, ToggleAction};
pub use transfer::TransferType;
