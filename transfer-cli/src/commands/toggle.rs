use content_transfer::wizard::WizardContext;
use content_transfer::NodeId;

use super::{print_rows, SourceArgs};
use crate::app::App;
use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "toggle", about = "Flip the selection of rows and save it")]
pub struct Toggle {
    #[clap(long, help = "Channel the rows belong to")]
    channel: String,
    #[clap(long, help = "Topic the rows belong to, defaults to the root")]
    topic: Option<String>,
    #[clap(long, action, help = "Toggle the whole topic")]
    all: bool,
    #[clap(help = "Ids of the rows to toggle")]
    nodes: Vec<String>,
    #[clap(flatten)]
    source: SourceArgs,
}

impl Toggle {
    pub async fn run(&self, app: &App) -> Result<(), AppError> {
        let router = app.router()?;
        let mut ctx = WizardContext::new();
        let topic = self.topic.as_deref().map(NodeId::from);
        app.open_channel(
            &router,
            &mut ctx,
            &NodeId::from(self.channel.as_str()),
            topic.as_ref(),
            self.source.source(),
        )
        .await?;

        if self.all {
            let action = ctx.toggle_all().ok_or(AppError::NothingBrowsed)?;
            println!("all: {:?}", action);
        }
        for id in &self.nodes {
            let action = ctx
                .toggle_child(&NodeId::from(id.as_str()))
                .ok_or_else(|| AppError::NoSuchRow(id.clone()))?;
            println!("{}: {:?}", id, action);
        }

        app.save(&ctx)?;
        print_rows(&ctx, false)
    }
}
