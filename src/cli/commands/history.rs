use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::history::WeeklyHistory;
use crate::core::recorder::SqliteRecorder;
use crate::core::watch::notice_cell;
use crate::errors::AppResult;
use crate::models::WeeklySummary;
use crate::utils::date::{WEEK, weekday_short};
use std::sync::Arc;

/// One line per displayed weekday; absent days get the placeholder.
pub fn render_week(summary: &WeeklySummary, all_days: bool, placeholder: &str) -> Vec<String> {
    let days = if all_days { &WEEK[..] } else { &WEEK[..5] };
    days.iter()
        .map(|d| {
            format!(
                "{}: {}",
                weekday_short(*d),
                summary.get(*d).unwrap_or(placeholder)
            )
        })
        .collect()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { json, all_days } = cmd {
        let recorder = Arc::new(SqliteRecorder::open(cfg.database_path())?);
        let history = WeeklyHistory::new(recorder, Arc::new(SystemClock), notice_cell());
        let summary = history.refresh()?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("📅 This week:\n");
        for line in render_week(&summary, *all_days || cfg.show_weekend, &cfg.empty_day_placeholder) {
            println!("  {}", line);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn working_days_only_by_default() {
        let mut s = WeeklySummary::new();
        s.insert(Weekday::Wed, "09:00 - 17:30".into());
        s.insert(Weekday::Sat, "10:00 - 12:00".into());

        let lines = render_week(&s, false, "00:00 - 00:00");
        assert_eq!(
            lines,
            vec![
                "Mon: 00:00 - 00:00",
                "Tue: 00:00 - 00:00",
                "Wed: 09:00 - 17:30",
                "Thu: 00:00 - 00:00",
                "Fri: 00:00 - 00:00",
            ]
        );

        let all = render_week(&s, true, "--");
        assert_eq!(all.len(), 7);
        assert_eq!(all[5], "Sat: 10:00 - 12:00");
        assert_eq!(all[6], "Sun: --");
    }
}
