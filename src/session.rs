use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::{NodeId, NodeRef};
use crate::selection::SelectionStore;
use crate::transfer::TransferType;
use crate::wizard::{Transition, WizardContext};
use crate::{Result, TransferError};

/*
Session snapshots are plain JSON objects with a `version` field. Bump
SESSION_VERSION whenever the shape of `SessionSnapshot` changes; older
snapshots are rejected rather than migrated.
*/
pub const SESSION_VERSION: u32 = 1;

/// The selection of one channel, saved so a transfer can be resumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub channel_id: NodeId,
    pub transfer_type: TransferType,
    #[serde(default)]
    pub drive_id: Option<String>,
    #[serde(default)]
    pub included: Vec<NodeRef>,
    #[serde(default)]
    pub omitted: Vec<NodeRef>,
}

impl SessionSnapshot {
    /// Snapshot the context, if a channel is being browsed
    pub fn capture(ctx: &WizardContext) -> Option<Self> {
        let channel = ctx.wizard.channel.as_ref()?;
        Some(SessionSnapshot {
            version: SESSION_VERSION,
            channel_id: channel.id.clone(),
            transfer_type: ctx
                .wizard
                .transfer_type
                .unwrap_or(TransferType::RemoteImport),
            drive_id: ctx.wizard.drive_id.clone(),
            included: ctx.selection.included(),
            omitted: ctx.selection.omitted(),
        })
    }

    /// The transition that reopens the saved channel
    pub fn resume(&self) -> Transition {
        Transition::SelectContentDirectly {
            channel_id: self.channel_id.clone(),
            drive_id: self.drive_id.clone(),
            for_export: self.transfer_type == TransferType::LocalExport,
        }
    }

    /// Overwrite `store` with the saved sets. A snapshot listing the same
    /// id in both sets is rejected and leaves `store` untouched.
    pub fn hydrate(&self, store: &mut SelectionStore) -> Result<()> {
        let conflicts: Vec<&NodeId> = self
            .included
            .iter()
            .filter(|entry| self.omitted.iter().any(|o| o.id == entry.id))
            .map(|entry| &entry.id)
            .collect();
        if !conflicts.is_empty() {
            return Err(TransferError::Session(
                self.channel_id.to_string(),
                format!("{:?} both included and omitted", conflicts),
            ));
        }
        store.replace_included(self.included.iter().cloned());
        store.replace_omitted(self.omitted.iter().cloned());
        Ok(())
    }
}

/// A session snapshot on disk
pub struct SessionFile {
    label: String,
    path: PathBuf,
}

impl SessionFile {
    /// Create a session file with a diagnostic label and file path
    pub fn new(label: impl Into<String>, path: &Path) -> Self {
        SessionFile {
            label: label.into(),
            path: PathBuf::from(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, `None` if nothing was saved yet
    pub fn load(&self) -> Result<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&self.path)?;
        let snapshot: SessionSnapshot = serde_json::from_reader(file)
            .map_err(|err| {
                TransferError::Session(self.label.clone(), err.to_string())
            })?;
        if snapshot.version != SESSION_VERSION {
            return Err(TransferError::Session(
                self.label.clone(),
                format!(
                    "version mismatch: expected {}, got {}",
                    SESSION_VERSION, snapshot.version
                ),
            ));
        }
        log::debug!(
            "session/{}: loaded {} included, {} omitted",
            self.label,
            snapshot.included.len(),
            snapshot.omitted.len()
        );
        Ok(Some(snapshot))
    }

    /// Write the snapshot next to its destination, then move it in place
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let dir = self.path.parent().ok_or_else(|| {
            TransferError::Session(
                self.label.clone(),
                "failed to get parent directory".to_owned(),
            )
        })?;
        fs::create_dir_all(dir)?;

        let temp = dir.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&temp, serde_json::to_vec_pretty(snapshot)?)?;
        if let Err(err) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }

        log::info!(
            "session/{}: {} entries written",
            self.label,
            snapshot.included.len() + snapshot.omitted.len()
        );
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            log::info!("session/{}: removed", self.label);
        }
        Ok(())
    }
}
