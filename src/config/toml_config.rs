use crate::config::StoreBackend;
use crate::utils::error::{PetError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Optional configuration file; every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub database: Option<DatabaseSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub store: Option<StoreBackend>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    pub user: Option<String>,
    pub password: Option<String>,
    pub server: Option<String>,
    pub name: Option<String>,
    pub max_connections: Option<u32>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PetError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PetError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

fn env_var_regex() -> &'static Regex {
    static ENV_RE: OnceLock<Regex> = OnceLock::new();
    ENV_RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"))
}

/// 替換環境變數 (例如 ${POSTGRES_PASSWORD})；未設定的保持原樣
fn substitute_env_vars(content: &str) -> String {
    env_var_regex()
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_file() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8080
store = "memory"

[database]
user = "pets"
password = "secret"
server = "db:5432"
name = "pets_db"
max_connections = 10
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        let server = config.server.unwrap();
        assert_eq!(server.port, Some(8080));
        assert_eq!(server.store, Some(StoreBackend::Memory));
        assert_eq!(config.database.unwrap().max_connections, Some(10));
    }

    #[test]
    fn test_empty_file_is_valid() {
        assert_eq!(FileConfig::from_toml_str("").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PETS_API_TEST_DB_PASSWORD", "from-env");

        let toml_content = r#"
[database]
password = "${PETS_API_TEST_DB_PASSWORD}"
user = "${PETS_API_TEST_UNSET_VAR}"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        let database = config.database.unwrap();
        assert_eq!(database.password.as_deref(), Some("from-env"));
        assert_eq!(database.user.as_deref(), Some("${PETS_API_TEST_UNSET_VAR}"));

        std::env::remove_var("PETS_API_TEST_DB_PASSWORD");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = FileConfig::from_toml_str("[server]\nworkers = 4\n");
        assert!(matches!(result, Err(PetError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 9001\n")
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.unwrap().port, Some(9001));
    }
}
