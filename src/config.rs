use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub storage: Storage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Storage {
    Postgres {
        dsn: String,
    },
    #[default]
    Memory,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn load_from_file(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

/// Builds the config from variables: `PG_DSN` selects PostgreSQL, `PORT`
/// overrides the listening port.
fn load_from_vars(
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let port = match var("PORT") {
        Some(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {e}"))?,
        None => DEFAULT_PORT,
    };

    let storage = match var("PG_DSN") {
        Some(dsn) => Storage::Postgres { dsn },
        None => Storage::Memory,
    };

    Ok(Config { port, storage })
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("STICKY_NOTES_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(Path::new(&config_path));
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file(Path::new("config.yaml"));
    }

    // Fallback to environment variables
    tracing::info!("No config file found, loading configuration from environment variables");
    load_from_vars(|name| env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{collections::HashMap, io::Write};

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_postgres_config_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "port: 9000\nstorage:\n  kind: postgres\n  dsn: postgres://notes@localhost/notes"
        )
        .unwrap();

        let config = load_from_file(file.path()).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(
            config.storage,
            Storage::Postgres {
                dsn: "postgres://notes@localhost/notes".to_string()
            }
        );
    }

    #[test]
    fn yaml_defaults_to_memory_storage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 8080").unwrap();

        let config = load_from_file(file.path()).unwrap();

        assert_eq!(config.storage, Storage::Memory);
    }

    #[test]
    fn variables_select_storage_and_port() {
        let config = load_from_vars(vars(&[("PG_DSN", "postgres://db"), ("PORT", "8081")])).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(
            config.storage,
            Storage::Postgres {
                dsn: "postgres://db".to_string()
            }
        );

        let config = load_from_vars(vars(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.storage, Storage::Memory);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load_from_vars(vars(&[("PORT", "eighty")])).unwrap_err();

        assert!(err.to_string().contains("PORT"));
    }
}
