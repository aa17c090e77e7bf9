use crate::types::{DrawRow, StoreRow};
use rusqlite::{Connection, OptionalExtension, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS lotto_draws (
    draw_number   INTEGER PRIMARY KEY,
    draw_date     TEXT NOT NULL,
    number1       INTEGER NOT NULL,
    number2       INTEGER NOT NULL,
    number3       INTEGER NOT NULL,
    number4       INTEGER NOT NULL,
    number5       INTEGER NOT NULL,
    number6       INTEGER NOT NULL,
    bonus_number  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS lucky_stores (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    name               TEXT NOT NULL,
    address            TEXT NOT NULL,
    region             TEXT NOT NULL,
    first_prize_count  INTEGER NOT NULL DEFAULT 0,
    total_prize_count  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS ai_predictions (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    prediction_type   TEXT NOT NULL,
    predicted_numbers TEXT NOT NULL,
    confidence_score  REAL NOT NULL,
    created_at        DATETIME DEFAULT CURRENT_TIMESTAMP
);
";

pub fn create_database_with_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
}

fn draw_from_row(row: &rusqlite::Row) -> Result<DrawRow> {
    Ok(DrawRow {
        draw_number: row.get(0)?,
        draw_date: row.get(1)?,
        number1: row.get(2)?,
        number2: row.get(3)?,
        number3: row.get(4)?,
        number4: row.get(5)?,
        number5: row.get(6)?,
        number6: row.get(7)?,
        bonus_number: row.get(8)?,
    })
}

pub fn insert_draw(conn: &Connection, draw: &DrawRow) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO lotto_draws (
            draw_number, draw_date, number1, number2, number3, number4, number5, number6, bonus_number
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.draw_number,
            draw.draw_date,
            draw.number1,
            draw.number2,
            draw.number3,
            draw.number4,
            draw.number5,
            draw.number6,
            draw.bonus_number,
        ],
    )?;
    Ok(changed > 0)
}

pub fn get_latest_draw(conn: &Connection) -> Result<Option<DrawRow>> {
    let mut stmt = conn.prepare(
        "SELECT draw_number, draw_date, number1, number2, number3, number4, number5, number6, bonus_number
         FROM lotto_draws ORDER BY draw_number DESC LIMIT 1",
    )?;
    let result = stmt.query_row([], draw_from_row).optional()?;
    Ok(result)
}

pub fn get_draws(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<DrawRow>> {
    let mut stmt = conn.prepare(
        "SELECT draw_number, draw_date, number1, number2, number3, number4, number5, number6, bonus_number
         FROM lotto_draws ORDER BY draw_number DESC LIMIT ?1 OFFSET ?2",
    )?;
    let draw_iter = stmt.query_map([limit, offset], draw_from_row)?;

    let mut results = Vec::new();
    for draw in draw_iter {
        results.push(draw?);
    }
    Ok(results)
}

/// Most recent `limit` draws, newest first. The hot/cold and pattern
/// analyses read their windows through this.
pub fn get_recent_draws(conn: &Connection, limit: i64) -> Result<Vec<DrawRow>> {
    get_draws(conn, limit, 0)
}

pub fn count_draws(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM lotto_draws", [], |row| row.get(0))?;
    Ok(count)
}

pub fn max_draw_number(conn: &Connection) -> Result<Option<i64>> {
    let max: Option<i64> =
        conn.query_row("SELECT MAX(draw_number) FROM lotto_draws", [], |row| row.get(0))?;
    Ok(max)
}

/// Occurrence count for every number 1..=45 across all six columns of
/// every historical draw. Numbers that never appeared come back with a
/// zero count so the distribution is always 45 entries long.
pub fn get_number_frequencies(conn: &Connection) -> Result<Vec<(i64, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT n, COUNT(*) FROM (
            SELECT number1 AS n FROM lotto_draws
            UNION ALL SELECT number2 FROM lotto_draws
            UNION ALL SELECT number3 FROM lotto_draws
            UNION ALL SELECT number4 FROM lotto_draws
            UNION ALL SELECT number5 FROM lotto_draws
            UNION ALL SELECT number6 FROM lotto_draws
         ) GROUP BY n ORDER BY n",
    )?;
    let freq_iter = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;

    let mut counts = [0i64; 45];
    for entry in freq_iter {
        let (number, count) = entry?;
        if (1..=45).contains(&number) {
            counts[(number - 1) as usize] = count;
        }
    }
    Ok((1..=45).map(|n| (n, counts[(n - 1) as usize])).collect())
}

pub fn get_stores(conn: &Connection, limit: i64) -> Result<Vec<StoreRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, address, region, first_prize_count, total_prize_count
         FROM lucky_stores
         ORDER BY first_prize_count DESC, total_prize_count DESC, id
         LIMIT ?1",
    )?;
    let store_iter = stmt.query_map([limit], |row| {
        Ok(StoreRow {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            region: row.get(3)?,
            first_prize_count: row.get(4)?,
            total_prize_count: row.get(5)?,
        })
    })?;

    let mut results = Vec::new();
    for store in store_iter {
        results.push(store?);
    }
    Ok(results)
}

pub fn insert_prediction(
    conn: &Connection,
    prediction_type: &str,
    predicted_numbers: &str,
    confidence_score: f64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO ai_predictions (prediction_type, predicted_numbers, confidence_score)
         VALUES (?1, ?2, ?3)",
        rusqlite::params![prediction_type, predicted_numbers, confidence_score],
    )?;
    Ok(())
}

pub fn count_predictions(conn: &Connection) -> Result<i64> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM ai_predictions", [], |row| row.get(0))?;
    Ok(count)
}


#[cfg(test)]
mod tests {
    use super::test_support::{test_conn, test_draw};
    use super::*;

    #[test]
    fn test_insert_and_count() {
        let conn = test_conn();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1, [1, 2, 3, 4, 5, 6], 7)).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
        assert_eq!(max_draw_number(&conn).unwrap(), Some(1));
    }

    #[test]
    fn test_duplicate_draw_ignored() {
        let conn = test_conn();

        let inserted = insert_draw(&conn, &test_draw(10, [1, 2, 3, 4, 5, 6], 7)).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(10, [7, 8, 9, 10, 11, 12], 13)).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_latest_and_paging_order() {
        let conn = test_conn();
        for n in 1..=5 {
            insert_draw(&conn, &test_draw(n, [1, 2, 3, 4, 5, 6], 7)).unwrap();
        }

        let latest = get_latest_draw(&conn).unwrap().unwrap();
        assert_eq!(latest.draw_number, 5);

        let page = get_draws(&conn, 2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].draw_number, 4);
        assert_eq!(page[1].draw_number, 3);
    }

    #[test]
    fn test_empty_database() {
        let conn = test_conn();
        assert!(get_latest_draw(&conn).unwrap().is_none());
        assert!(max_draw_number(&conn).unwrap().is_none());
        let freqs = get_number_frequencies(&conn).unwrap();
        assert_eq!(freqs.len(), 45);
        assert!(freqs.iter().all(|(_, c)| *c == 0));
    }

    #[test]
    fn test_frequency_sum_matches_draw_count() {
        let conn = test_conn();
        insert_draw(&conn, &test_draw(1, [1, 2, 3, 4, 5, 6], 7)).unwrap();
        insert_draw(&conn, &test_draw(2, [1, 12, 23, 34, 44, 45], 8)).unwrap();
        insert_draw(&conn, &test_draw(3, [2, 4, 6, 8, 10, 12], 9)).unwrap();

        let freqs = get_number_frequencies(&conn).unwrap();
        assert_eq!(freqs.len(), 45);
        let total: i64 = freqs.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 6 * count_draws(&conn).unwrap());
        assert_eq!(freqs[0], (1, 2));
        assert_eq!(freqs[44], (45, 1));
        // 13 never appeared
        assert_eq!(freqs[12], (13, 0));
    }

    #[test]
    fn test_store_ordering() {
        let conn = test_conn();
        super::test_support::seed_stores(&conn);

        let stores = get_stores(&conn, 10).unwrap();
        assert_eq!(stores.len(), 4);
        assert_eq!(stores[0].name, "명당슈퍼");
        assert_eq!(stores[1].name, "대박로또");
        assert_eq!(stores[2].name, "행운복권방");
        assert_eq!(stores[3].name, "길목판매점");

        let top = get_stores(&conn, 2).unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_insert_prediction() {
        let conn = test_conn();
        insert_prediction(&conn, "neural", "3,9,17,24,38,41", 0.63).unwrap();
        assert_eq!(count_predictions(&conn).unwrap(), 1);
    }
}
