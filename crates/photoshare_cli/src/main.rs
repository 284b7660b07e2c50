//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `photoshare_core` linkage and schema bootstrap from a shell.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `photoshare_cli [DB_PATH]`. Without a path an in-memory database
//! is used. `PHOTOSHARE_LOG_DIR` (absolute) enables file logging at
//! `PHOTOSHARE_LOG_LEVEL` or the build default.

use photoshare_core::db::migrations::current_user_version;
use photoshare_core::db::{open_db, open_db_in_memory};
use photoshare_core::{Comment, Like, Post, Record, User};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("PHOTOSHARE_LOG_DIR") {
        let level = std::env::var("PHOTOSHARE_LOG_LEVEL")
            .unwrap_or_else(|_| photoshare_core::default_log_level().to_string());
        photoshare_core::init_logging(&level, &log_dir)?;
    }

    println!("photoshare_core ping={}", photoshare_core::ping());
    println!("photoshare_core version={}", photoshare_core::core_version());

    let conn = match std::env::args().nth(1) {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    println!("schema_version={}", current_user_version(&conn)?);

    for table in [User::TABLE, Post::TABLE, Comment::TABLE, Like::TABLE] {
        let rows: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))?;
        println!("{table}={rows}");
    }

    Ok(())
}
