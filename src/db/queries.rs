use crate::errors::AppResult;
use crate::models::{NewShift, ShiftRecord};
use crate::utils::date::{format_timestamp, parse_timestamp};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn conversion_error(col: usize, e: crate::errors::AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
}

pub fn map_row(row: &Row) -> Result<ShiftRecord> {
    let date_str: String = row.get("date")?;
    let start_str: String = row.get("start_time")?;
    let end_str: Option<String> = row.get("end_time")?;

    let date = parse_timestamp(&date_str).map_err(|e| conversion_error(1, e))?;
    let start = parse_timestamp(&start_str).map_err(|e| conversion_error(2, e))?;
    let end = end_str
        .map(|s| parse_timestamp(&s))
        .transpose()
        .map_err(|e| conversion_error(3, e))?;

    Ok(ShiftRecord {
        id: row.get("id")?,
        date,
        start,
        end,
        duration_millis: row.get("duration_millis")?,
    })
}

/// Insert a completed shift; returns the assigned id.
pub fn insert_shift(conn: &Connection, shift: &NewShift) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO shifts (date, start_time, end_time, duration_millis)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            format_timestamp(&shift.date),
            format_timestamp(&shift.start),
            format_timestamp(&shift.end),
            shift.duration_millis,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Latest inserted shift (highest id).
pub fn last_shift(conn: &Connection) -> AppResult<Option<ShiftRecord>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM shifts ORDER BY id DESC LIMIT 1")?;
    Ok(stmt.query_row([], map_row).optional()?)
}

/// Shifts with `date >= since`, newest date first; same date → newest insert first.
pub fn shifts_since(conn: &Connection, since: &NaiveDateTime) -> AppResult<Vec<ShiftRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM shifts
         WHERE date >= ?1
         ORDER BY date DESC, id DESC",
    )?;

    let rows = stmt.query_map([format_timestamp(since)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Remove shifts with `date < older_than`; returns the number of rows removed.
pub fn delete_shifts_older_than(conn: &Connection, older_than: &NaiveDateTime) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM shifts WHERE date < ?1",
        [format_timestamp(older_than)],
    )?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use chrono::NaiveDate;

    fn dt(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn insert_then_read_back() {
        let pool = DbPool::in_memory().unwrap();
        let shift = NewShift::completed(dt(15, 9, 0), dt(15, 17, 30)).unwrap();
        let id = insert_shift(&pool.conn, &shift).unwrap();

        let last = last_shift(&pool.conn).unwrap().unwrap();
        assert_eq!(last, shift.into_record(id));
    }

    #[test]
    fn since_orders_by_date_then_id_descending() {
        let pool = DbPool::in_memory().unwrap();
        let a = insert_shift(&pool.conn, &NewShift::completed(dt(14, 9, 0), dt(14, 10, 0)).unwrap()).unwrap();
        let b = insert_shift(&pool.conn, &NewShift::completed(dt(16, 9, 0), dt(16, 10, 0)).unwrap()).unwrap();
        let c = insert_shift(&pool.conn, &NewShift::completed(dt(14, 9, 0), dt(14, 11, 0)).unwrap()).unwrap();
        insert_shift(&pool.conn, &NewShift::completed(dt(10, 9, 0), dt(10, 10, 0)).unwrap()).unwrap();

        let ids: Vec<i64> = shifts_since(&pool.conn, &dt(13, 0, 0))
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![b, c, a]);
    }

    #[test]
    fn stored_null_end_reads_as_none() {
        let pool = DbPool::in_memory().unwrap();
        pool.conn
            .execute(
                "INSERT INTO shifts (date, start_time, end_time, duration_millis)
                 VALUES ('2025-10-15T09:00:00.000', '2025-10-15T09:00:00.000', NULL, 0)",
                [],
            )
            .unwrap();
        let last = last_shift(&pool.conn).unwrap().unwrap();
        assert_eq!(last.end, None);
    }

    #[test]
    fn delete_is_strictly_before() {
        let pool = DbPool::in_memory().unwrap();
        insert_shift(&pool.conn, &NewShift::completed(dt(12, 23, 59), dt(12, 23, 59)).unwrap()).unwrap();
        insert_shift(&pool.conn, &NewShift::completed(dt(13, 0, 0), dt(13, 1, 0)).unwrap()).unwrap();

        let removed = delete_shifts_older_than(&pool.conn, &dt(13, 0, 0)).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(shifts_since(&pool.conn, &dt(1, 0, 0)).unwrap().len(), 1);
    }
}
