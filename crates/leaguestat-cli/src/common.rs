use leaguestat_core::{Config, Database, Engine};

/// Open the configured database (path override or default location).
pub fn open_database() -> Result<Database, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    open_with(&config)
}

/// Build an engine over the configured database.
pub fn open_engine() -> Result<Engine<Database>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = open_with(&config)?;
    Ok(Engine::with_config(db, config.engine))
}

fn open_with(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    let db = match &config.database_path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    Ok(db)
}
