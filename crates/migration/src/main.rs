//! Schema tool for a SpendWise SQLite file.
//!
//! `migration [up|down|fresh|refresh|status] [steps]`; the database is taken
//! from `DATABASE_URL` and defaults to `./spendwise.db`.

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const USAGE: &str = "usage: migration [up [steps] | down [steps] | fresh | refresh | status]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());
    let steps = match args.next() {
        Some(raw) => match raw.parse::<u32>() {
            Ok(steps) => Some(steps),
            Err(_) => {
                eprintln!("invalid step count {raw:?}\n{USAGE}");
                std::process::exit(2);
            }
        },
        None => None,
    };

    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:./spendwise.db?mode=rwc".to_string());
    let db = Database::connect(&db_url).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, steps).await?,
        // One step unless told otherwise.
        "down" => migration::Migrator::down(&db, Some(steps.unwrap_or(1))).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "refresh" => migration::Migrator::refresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
