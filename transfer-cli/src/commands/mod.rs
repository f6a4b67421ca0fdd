use clap::Subcommand;
use content_transfer::wizard::WizardContext;
use content_transfer::{CheckboxStatus, RowNote, TransferError};

use crate::app::Source;
use crate::AppError;

mod browse;
mod reset;
mod status;
mod toggle;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Browse(browse::Browse),
    Toggle(toggle::Toggle),
    Status(status::Status),
    Reset(reset::Reset),
}

#[derive(Clone, Debug, clap::Args)]
pub struct SourceArgs {
    #[clap(long, help = "Drive to import from or export to")]
    drive: Option<String>,
    #[clap(long, action, help = "Export to the drive instead of importing")]
    export: bool,
}

impl SourceArgs {
    /// `None` when neither flag was given
    pub fn source(&self) -> Option<Source> {
        if self.drive.is_none() && !self.export {
            return None;
        }
        Some(Source {
            drive_id: self.drive.clone(),
            for_export: self.export,
        })
    }
}

pub fn marker(status: CheckboxStatus) -> &'static str {
    match status {
        CheckboxStatus::Checked => "[x]",
        CheckboxStatus::Unchecked => "[ ]",
        CheckboxStatus::Indeterminate => "[-]",
    }
}

fn note(note: RowNote) -> &'static str {
    match note {
        RowNote::AlreadyOnDevice => "already on device",
        RowNote::NotOnDevice => "not on device",
        RowNote::Unavailable => "unavailable",
        RowNote::Empty => "empty",
    }
}

/// Print the current topic and its rows
pub fn print_rows(ctx: &WizardContext, json: bool) -> Result<(), AppError> {
    let rows = ctx.rows();
    if json {
        let output =
            serde_json::to_string_pretty(&rows).map_err(TransferError::from)?;
        println!("{}", output);
        return Ok(());
    }

    let topic = ctx
        .wizard
        .current_topic
        .as_ref()
        .ok_or(AppError::NothingBrowsed)?;
    if let Some(status) = ctx.select_all_status() {
        let mut trail: Vec<&str> = ctx
            .wizard
            .path
            .stubs()
            .iter()
            .map(|stub| stub.title.as_str())
            .collect();
        trail.push(&topic.node.title);
        println!("{} {}", marker(status), trail.join(" / "));
    }

    for row in rows {
        let suffix = match row.note {
            Some(reason) => format!(" ({})", note(reason)),
            None => String::new(),
        };
        println!(
            "  {} {}{}  [{}]",
            marker(row.status),
            row.title,
            suffix,
            row.id
        );
    }
    Ok(())
}
