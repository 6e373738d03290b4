use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_BLOCK_VERSION: &str = "v1";
const DEFAULT_MINING_DIFFICULTY: usize = 2;

const BLOCK_VERSION_KEY: &str = "BLOCK_VERSION";
const MINING_DIFFICULTY_KEY: &str = "MINING_DIFFICULTY";

/// Process-wide ledger settings, backed by environment variables.
///
/// `BLOCK_VERSION` tags every block built through [`Config::get_block_version`]
/// and `MINING_DIFFICULTY` sets the number of leading zero characters a mined
/// hash must carry.
pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        let mut map = HashMap::new();

        let mut block_version = String::from(DEFAULT_BLOCK_VERSION);
        if let Ok(version) = env::var(BLOCK_VERSION_KEY) {
            block_version = version;
        }
        map.insert(String::from(BLOCK_VERSION_KEY), block_version);

        if let Ok(difficulty) = env::var(MINING_DIFFICULTY_KEY) {
            map.insert(String::from(MINING_DIFFICULTY_KEY), difficulty);
        }

        Config {
            inner: RwLock::new(map),
        }
    }

    pub fn get_block_version(&self) -> String {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner
            .get(BLOCK_VERSION_KEY)
            .expect("Block version should always be present in config")
            .clone()
    }

    pub fn set_block_version(&self, version: String) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        inner.insert(String::from(BLOCK_VERSION_KEY), version);
    }

    /// Returns the configured mining difficulty, falling back to the default
    /// when unset or unparsable.
    pub fn get_mining_difficulty(&self) -> usize {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner
            .get(MINING_DIFFICULTY_KEY)
            .and_then(|difficulty| difficulty.parse().ok())
            .unwrap_or(DEFAULT_MINING_DIFFICULTY)
    }

    pub fn set_mining_difficulty(&self, difficulty: usize) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        inner.insert(String::from(MINING_DIFFICULTY_KEY), difficulty.to_string());
    }
}
