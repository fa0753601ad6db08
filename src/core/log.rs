use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const OP_WIDTH_MAX: usize = 60;

/// Colour for an operation name in the log listing.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "insert" => Colour::Green,
        "prune" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    /// `operation (target)`, cut to the listing width.
    fn op_label(&self) -> String {
        let label = if self.target.is_empty() {
            self.operation.clone()
        } else {
            format!("{} ({})", self.operation, self.target)
        };

        if label.chars().count() > OP_WIDTH_MAX {
            let mut s: String = label.chars().take(OP_WIDTH_MAX - 3).collect();
            s.push_str("...");
            s
        } else {
            label
        }
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn load(pool: &DbPool) -> AppResult<Vec<LogEntry>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }
        Ok(entries)
    }

    /// Aligned, uncoloured lines; the operation word is coloured on print.
    pub fn render(entries: &[LogEntry]) -> Vec<(String, String)> {
        let op_w = entries
            .iter()
            .map(|e| e.op_label().chars().count())
            .max()
            .unwrap_or(10);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(0);

        entries
            .iter()
            .map(|e| {
                let label = e.op_label();
                let padding = " ".repeat(op_w.saturating_sub(label.chars().count()));
                let line = format!(
                    "{:>id_w$}: {:<date_w$} | {}{} => {}",
                    e.id,
                    e.date,
                    label,
                    padding,
                    e.message,
                    id_w = id_w,
                    date_w = date_w
                );
                (e.operation.clone(), line)
            })
            .collect()
    }

    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = Self::load(pool)?;

        println!("📜 Internal log:\n");

        for (op, line) in Self::render(&entries) {
            // colour only the operation word, which sits right after " | "
            let colored = match line.split_once(" | ") {
                Some((head, tail)) => match tail.strip_prefix(op.as_str()) {
                    Some(rest) => format!(
                        "{} | {}{}",
                        head,
                        color_for_operation(&op).paint(op.as_str()),
                        rest
                    ),
                    None => line.clone(),
                },
                None => line.clone(),
            };
            println!("{}", colored);
        }

        Ok(())
    }
}
