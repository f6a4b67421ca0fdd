use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use content_transfer::catalog::JsonCatalog;
use content_transfer::config::TransferConfig;
use content_transfer::session::{SessionFile, SessionSnapshot};
use content_transfer::wizard::{
    LogErrorSink, NoopNavigator, Outcome, Router, Transition, WizardContext,
};
use content_transfer::{NodeId, TransferType};

use crate::AppError;

/// Drive and direction of a transfer, as given on the command line
#[derive(Clone, Debug, Default)]
pub struct Source {
    pub drive_id: Option<String>,
    pub for_export: bool,
}

impl Source {
    pub fn transfer_type(&self) -> TransferType {
        TransferType::from_source(self.for_export, self.drive_id.as_deref())
    }

    /// Whether `snapshot` was saved for this direction and drive
    pub fn matches(&self, snapshot: &SessionSnapshot) -> bool {
        snapshot.transfer_type == self.transfer_type()
            && snapshot.drive_id == self.drive_id
    }
}

pub struct App {
    pub config: TransferConfig,
    catalog: Option<PathBuf>,
    session: SessionFile,
}

impl App {
    pub fn open(
        catalog: Option<PathBuf>,
        config: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => TransferConfig::load_from(path),
            None => TransferConfig::load(),
        }
        .context("Failed to load configuration")?;
        let session_file = config
            .session_file()
            .context("Failed to locate the session file")?;
        log::debug!("cli: session file {}", session_file.display());

        Ok(App {
            session: SessionFile::new("cli", &session_file),
            config,
            catalog,
        })
    }

    pub fn session(&self) -> &SessionFile {
        &self.session
    }

    pub fn router(&self) -> Result<Router, AppError> {
        let path = self.catalog.as_ref().ok_or(AppError::CatalogMissing)?;
        let catalog = JsonCatalog::open(path)?;
        Ok(Router::new(
            Arc::new(catalog),
            Arc::new(LogErrorSink),
            Arc::new(NoopNavigator),
        )
        .with_fetch_timeout(self.config.fetch_timeout()))
    }

    pub async fn navigate(
        &self,
        router: &Router,
        ctx: &mut WizardContext,
        transition: Transition,
    ) -> Result<(), AppError> {
        let label = format!("{:?}", transition);
        match router.navigate(ctx, transition).await {
            Outcome::Applied | Outcome::Ignored => Ok(()),
            Outcome::Redirected | Outcome::Discarded => {
                Err(AppError::Redirected(label))
            }
            Outcome::Failed => Err(AppError::FetchFailed(label)),
        }
    }

    /// Browse `topic` of `channel_id`, with the selection saved for that
    /// channel restored. A snapshot saved for another direction or drive
    /// than `source` is left alone.
    pub async fn open_channel(
        &self,
        router: &Router,
        ctx: &mut WizardContext,
        channel_id: &NodeId,
        topic: Option<&NodeId>,
        source: Option<Source>,
    ) -> Result<(), AppError> {
        let saved = self.session.load()?.filter(|snapshot| {
            &snapshot.channel_id == channel_id
                && source.as_ref().map_or(true, |source| {
                    source.matches(snapshot)
                })
        });

        let transition = match (source, &saved) {
            (Some(source), _) => Transition::SelectContentDirectly {
                channel_id: channel_id.clone(),
                drive_id: source.drive_id,
                for_export: source.for_export,
            },
            (None, Some(snapshot)) => snapshot.resume(),
            (None, None) => Transition::SelectContentDirectly {
                channel_id: channel_id.clone(),
                drive_id: None,
                for_export: self.config.transfer_type()
                    == TransferType::LocalExport,
            },
        };
        self.navigate(router, ctx, transition).await?;

        if let Some(snapshot) = saved {
            snapshot.hydrate(&mut ctx.selection)?;
        }
        if let Some(topic) = topic {
            self.navigate(
                router,
                ctx,
                Transition::GotoTopicTreeview {
                    node_id: topic.clone(),
                    node: None,
                },
            )
            .await?;
        }
        Ok(())
    }

    pub fn save(&self, ctx: &WizardContext) -> Result<(), AppError> {
        match SessionSnapshot::capture(ctx) {
            Some(snapshot) => self.session.save(&snapshot)?,
            None => return Err(AppError::NothingBrowsed),
        }
        Ok(())
    }
}
