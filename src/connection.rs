use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub fn conn(database_url: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {:?}", parent))?;
        }
    }

    let conn = Connection::open(database_url)
        .with_context(|| format!("failed to open database {}", database_url))?;

    // Initialize the database tables
    crate::database::create_database_with_connection(&conn)?;

    Ok(conn)
}
