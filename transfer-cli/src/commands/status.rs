use crate::app::App;
use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "status", about = "Show the saved selection")]
pub struct Status {
    #[clap(long, action, help = "Print the snapshot as JSON")]
    json: bool,
}

impl Status {
    pub fn run(&self, app: &App) -> Result<(), AppError> {
        let snapshot = match app.session().load()? {
            Some(snapshot) => snapshot,
            None => {
                println!("No selection saved");
                return Ok(());
            }
        };
        if self.json {
            let output = serde_json::to_string_pretty(&snapshot)
                .map_err(content_transfer::TransferError::from)?;
            println!("{}", output);
            return Ok(());
        }

        println!("channel:  {}", snapshot.channel_id);
        println!("transfer: {}", snapshot.transfer_type);
        if let Some(drive) = &snapshot.drive_id {
            println!("drive:    {}", drive);
        }
        for (label, entries) in
            [("include", &snapshot.included), ("omit", &snapshot.omitted)]
        {
            for entry in entries {
                let mut trail: Vec<&str> = entry
                    .path
                    .stubs()
                    .iter()
                    .map(|stub| stub.title.as_str())
                    .collect();
                trail.push(entry.id.as_str());
                println!("{:<8}  {}", label, trail.join(" / "));
            }
        }
        Ok(())
    }
}
