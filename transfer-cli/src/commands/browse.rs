use content_transfer::wizard::{Transition, WizardContext};
use content_transfer::NodeId;

use super::{print_rows, SourceArgs};
use crate::app::App;
use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "browse", about = "List channels, or the rows of a topic")]
pub struct Browse {
    #[clap(long, help = "Channel to browse, channels are listed if omitted")]
    channel: Option<String>,
    #[clap(long, help = "Topic to list, defaults to the channel root")]
    topic: Option<String>,
    #[clap(flatten)]
    source: SourceArgs,
    #[clap(long, action, help = "Print rows as JSON")]
    json: bool,
}

impl Browse {
    pub async fn run(&self, app: &App) -> Result<(), AppError> {
        let router = app.router()?;
        let mut ctx = WizardContext::new();

        let channel = match &self.channel {
            Some(channel) => NodeId::from(channel.as_str()),
            None => {
                let source = self.source.source().unwrap_or_default();
                app.navigate(
                    &router,
                    &mut ctx,
                    Transition::AvailableChannelsDirectly {
                        for_export: source.for_export,
                        drive_id: source.drive_id,
                    },
                )
                .await?;
                for channel in &ctx.wizard.available_channels {
                    println!(
                        "{}  {} ({}/{} on device)",
                        channel.id,
                        channel.name,
                        channel.on_device_resources,
                        channel.total_resources
                    );
                }
                return Ok(());
            }
        };

        let topic = self.topic.as_deref().map(NodeId::from);
        app.open_channel(
            &router,
            &mut ctx,
            &channel,
            topic.as_ref(),
            self.source.source(),
        )
        .await?;
        print_rows(&ctx, self.json)
    }
}
