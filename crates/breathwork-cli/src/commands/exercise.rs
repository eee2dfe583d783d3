use breathwork_core::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ExerciseAction {
    /// List available exercises
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one exercise as JSON
    Show {
        /// Exercise id (e.g. "478", "box")
        id: String,
    },
}

pub fn run(action: ExerciseAction) -> Result<(), Box<dyn std::error::Error>> {
    let catalogue = Config::load_or_default().catalogue();

    match action {
        ExerciseAction::List { json } => {
            if json {
                let all: Vec<_> = catalogue.iter().collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
                return Ok(());
            }
            println!("{:<8} {:<16} {:<8} {:>6} {:>6}", "ID", "NAME", "PATTERN", "CYCLES", "MIN");
            for e in catalogue.iter() {
                println!(
                    "{:<8} {:<16} {:<8} {:>6} {:>6}",
                    e.id,
                    e.name,
                    e.pattern(),
                    e.cycles,
                    e.approx_duration_min
                );
            }
        }
        ExerciseAction::Show { id } => {
            let profile = catalogue.require(&id)?;
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
    }
    Ok(())
}
