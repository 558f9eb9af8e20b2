//! Binary entry point: read the config, open the SQLite file, and drive the
//! Ratatui event loop until the user exits.
use book_inventory::{init_logging, open_database, run_app, App, Config};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config_path = Config::default_path()?;
    let config = Config::load(&config_path)?;
    init_logging(&config.log_path()?, config.log_level()?)?;

    let db_path = config.db_path()?;
    info!(
        config = %config_path.display(),
        db = %db_path.display(),
        filter_mode = ?config.filter_mode(),
        "starting book inventory"
    );

    let conn = open_database(&db_path)?;
    let mut app = App::new(conn, config.filter_mode())?;
    run_app(&mut app)
}
