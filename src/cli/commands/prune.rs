use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::recorder::{ShiftRecorder, SqliteRecorder};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::date;
use chrono::NaiveTime;

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Prune { before, yes } = cmd {
        let day = date::parse_date(before).ok_or_else(|| AppError::InvalidDate(before.into()))?;
        let cutoff = day.and_time(NaiveTime::MIN);

        let prompt = format!("Delete every shift that began before {}? This action is irreversible.", day);
        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        let recorder = SqliteRecorder::open(cfg.database_path())?;
        let removed = recorder.delete_older_than(&cutoff)?;

        success(format!("Deleted {} shift(s) dated before {}.", removed, day));
    }

    Ok(())
}
