use crate::app::App;
use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "reset", about = "Forget the saved selection")]
pub struct Reset {}

impl Reset {
    pub fn run(&self, app: &App) -> Result<(), AppError> {
        app.session().remove()?;
        println!("Selection cleared: {}", app.session().path().display());
        Ok(())
    }
}
