pub mod config;
pub mod diagnostics;
pub mod export;
pub mod metrics;
pub mod workout;

use gympal_core::storage::data_dir;
use gympal_core::{logging, Config, Database, User};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Config, database and the configured user, opened once per command.
pub struct Session {
    pub config: Config,
    pub db: Database,
    pub user: User,
}

impl Session {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let db = Database::open()?;
        let user = db.get_or_create_user(&config.user.email, &config.user.units)?;
        Ok(Self { config, db, user })
    }
}

/// Install the tracing subscriber using the on-disk logging settings.
///
/// A broken config file must not block `config reset`, so defaults are used
/// when it cannot be read.
pub fn init_logging() -> CmdResult {
    let config = Config::load_or_default();
    logging::init(&config.logging, &data_dir()?)?;
    Ok(())
}
