use breathwork_core::{day_buckets, recompute, Database};
use chrono::Local;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current statistics, recomputed as of now
    Show,
    /// Minutes and sessions per day, newest first
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.sessions()?;

    match action {
        StatsAction::Show => {
            // The stored snapshot was computed at the last session; today
            // and the streak depend on when you look.
            let stats = recompute(&sessions, &Local::now());
            db.save_snapshot(&stats)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::History { json } => {
            let days = day_buckets(&sessions, &Local);
            if json {
                println!("{}", serde_json::to_string_pretty(&days)?);
                return Ok(());
            }
            if days.is_empty() {
                println!("no sessions yet");
                return Ok(());
            }
            println!("{:<10} {:>8} {:>8}", "DATE", "SESSIONS", "MINUTES");
            for day in days {
                println!("{:<10} {:>8} {:>8}", day.date, day.sessions, day.minutes);
            }
        }
    }
    Ok(())
}
