use crate::config::Config;
use crate::core::recorder::{ShiftRecorder, SqliteRecorder};
use crate::errors::AppResult;
use crate::models::ShiftRecord;
use crate::ui::messages::info;
use crate::utils::date::weekday_short;
use crate::utils::time::format_elapsed;
use chrono::Duration;

pub fn describe(rec: &ShiftRecord) -> String {
    format!(
        "#{} {} {}: {} ({})",
        rec.id,
        weekday_short(rec.weekday()),
        rec.date.format("%Y-%m-%d"),
        rec.interval_text(),
        format_elapsed(Duration::milliseconds(rec.duration_millis))
    )
}

pub fn handle(cfg: &Config) -> AppResult<()> {
    let recorder = SqliteRecorder::open(cfg.database_path())?;

    match recorder.most_recent()? {
        Some(rec) => println!("🕘 Last shift: {}", describe(&rec)),
        None => info("No shifts recorded yet."),
    }

    Ok(())
}
