use bookshelf_security::AuthConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process-local map; contents are lost on restart.
    #[default]
    Memory,
    /// SQLite through sea-orm.
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub kind: StorageKind,
    /// Used when `kind` is `sqlite`.
    pub dsn: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Memory,
            dsn: "sqlite://books.db?mode=rwc".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BooksConfig {
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub max_field_len: usize,
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            max_field_len: 255,
        }
    }
}
