use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::migrate::applied_versions;
use crate::db::store::{SqliteStore, StateStore};
use crate::errors::AppResult;
use crate::models::state::AppState;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database with all pending migrations
///  - the state snapshot, if none exists yet
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing rOfficeTracker…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &db_path);

    // opening the store runs the migrations
    let mut store = SqliteStore::open(&db_path)?;

    match store.load() {
        Ok(Some(_)) => println!("ℹ️  Existing tracker state kept"),
        Ok(None) => store.save(&AppState::initial())?,
        Err(e) => eprintln!("⚠️ Stored tracker state is unreadable ({}); it will be replaced on the next change", e),
    }

    let versions = applied_versions(store.conn())?;
    println!(
        "✅ Database initialized at {} (schema {})",
        &db_path,
        versions.last().map(String::as_str).unwrap_or("-")
    );

    if let Err(e) = log::ttlog(
        store.conn(),
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    ) {
        eprintln!("⚠️ Failed to write internal log: {}", e);
    }

    println!("🎉 rOfficeTracker initialization completed!");
    Ok(())
}
