use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl ApplicationSettings {
    pub fn address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Defaults, then `file` if it exists, then `TRIVIA__SECTION__KEY` variables.
pub fn get_configuration(file: &Path) -> Result<Settings, ConfigError> {
    Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 5000)?
        .set_default("database.path", "trivia.db")?
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix("TRIVIA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = get_configuration(Path::new("does-not-exist.yaml")).unwrap();
        assert_eq!(settings.application.port, 5000);
        assert_eq!(
            settings.application.address().unwrap(),
            "127.0.0.1:5000".parse().unwrap()
        );
        assert_eq!(settings.database.path, PathBuf::from("trivia.db"));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("configuration.yaml");
        std::fs::write(
            &file,
            "application:\n  port: 8081\ndatabase:\n  path: /tmp/quiz.db\n",
        )
        .unwrap();

        let settings = get_configuration(&file).unwrap();
        assert_eq!(settings.application.host, "127.0.0.1");
        assert_eq!(settings.application.port, 8081);
        assert_eq!(settings.database.path, PathBuf::from("/tmp/quiz.db"));
    }
}
