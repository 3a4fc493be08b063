//! Database credentials handed to the project through `.env`.

use std::fs::OpenOptions;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use crate::core::error::AppError;
use crate::core::models::Database;
use crate::utils::validation::sanitize_database_name;

/// Host used when the platform did not report one.
pub const DEFAULT_DB_HOST: &str = "mysql.ufazien.com";

/// Port used when the platform did not report one.
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Connection settings written to the project's `.env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEnv {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl DatabaseEnv {
    /// Connection settings of a database whose credentials are available.
    pub fn from_database(database: &Database) -> Option<Self> {
        let credentials = database.credentials()?;
        Some(Self {
            name: database.name.clone(),
            host: database
                .host
                .clone()
                .unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port: database.port.unwrap_or(DEFAULT_DB_PORT),
            username: credentials.username,
            password: credentials.password,
        })
    }

    fn render(&self) -> String {
        format!(
            "# Database Configuration\nDB_HOST={}\nDB_PORT={}\nDB_NAME={}\nDB_USER={}\nDB_PASSWORD={}\n",
            self.host, self.port, self.name, self.username, self.password
        )
    }
}

/// Manager for generated names and credential files.
pub struct SecretsManager;

impl SecretsManager {
    /// Generates a random lowercase alphabetic string.
    pub fn generate_alphabetic(length: usize) -> String {
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

        let mut rng = SimpleRng::new();

        std::iter::repeat_with(|| {
            let idx = rng.next() as usize % CHARSET.len();
            CHARSET[idx] as char
        })
        .take(length)
        .collect()
    }

    /// Unique-ish database name for a subdomain: `<subdomain>_<6 letters>_db`.
    pub fn database_name(subdomain: &str) -> String {
        let raw = format!("{}_{}_db", subdomain, Self::generate_alphabetic(6));
        sanitize_database_name(&raw, 63)
    }

    /// Writes `.env` with mode 600 (owner read/write only).
    pub fn write_env_file(project_dir: &Path, env: &DatabaseEnv) -> Result<(), AppError> {
        let path = project_dir.join(".env");

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&path)
            .map_err(|e| AppError::Config(format!("Failed to create env file: {}", e)))?;

        file.write_all(env.render().as_bytes())
            .map_err(|e| AppError::Config(format!("Failed to write env file: {}", e)))?;

        Ok(())
    }
}

/// Simple random number generator using system time.
/// Not cryptographically secure, only used for name suffixes.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);

        // XorShift never leaves zero
        Self { state: seed | 1 }
    }

    fn next(&mut self) -> u64 {
        // XorShift algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ResourceStatus;
    use std::fs;
    use tempfile::TempDir;

    fn database(username: Option<&str>, password: Option<&str>) -> Database {
        Database {
            id: "db-1".into(),
            name: "shop_qwerty_db".into(),
            db_type: "mysql".into(),
            status: ResourceStatus::Active,
            host: None,
            port: Some(3307),
            username: username.map(String::from),
            password: password.map(String::from),
            error_message: None,
        }
    }

    #[test]
    fn test_generate_alphabetic() {
        let value = SecretsManager::generate_alphabetic(6);
        assert_eq!(value.len(), 6);
        assert!(value.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_database_name() {
        let name = SecretsManager::database_name("My-Shop");
        assert!(name.starts_with("my_shop_"));
        assert!(name.ends_with("_db"));
        assert_eq!(name.len(), "my_shop_".len() + 6 + "_db".len());
    }

    #[test]
    fn test_env_requires_credentials() {
        assert!(DatabaseEnv::from_database(&database(None, None)).is_none());

        let env = DatabaseEnv::from_database(&database(Some("u"), Some("p"))).unwrap();
        assert_eq!(env.host, DEFAULT_DB_HOST);
        assert_eq!(env.port, 3307);
    }

    #[test]
    fn test_write_env_file() {
        let dir = TempDir::new().unwrap();
        let env = DatabaseEnv::from_database(&database(Some("shop"), Some("pw"))).unwrap();

        SecretsManager::write_env_file(dir.path(), &env).unwrap();

        let content = fs::read_to_string(dir.path().join(".env")).unwrap();
        assert!(content.starts_with("# Database Configuration\n"));
        assert!(content.contains("\nDB_USER=shop\n"));
        assert!(content.contains("\nDB_NAME=shop_qwerty_db\n"));
        assert!(content.contains("\nDB_PORT=3307\n"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(dir.path().join(".env")).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
