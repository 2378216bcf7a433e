use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// CockroachDB connection URL (Postgres wire protocol)
    pub database_url: String,
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        let mut config: AppConfig =
            serde_yaml::from_str(&content).expect("Failed to parse config yaml");

        // Deployment environments inject the URL rather than editing the file
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
log_level: debug
log_dir: ./logs
log_file: test.log
use_json: true
rotation: hourly
database_url: postgres://root@127.0.0.1:26257/bank?sslmode=disable
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).expect("should parse");
        assert_eq!(config.log_level, "debug");
        assert!(config.use_json);
        assert_eq!(config.rotation, "hourly");
        assert_eq!(
            config.database_url,
            "postgres://root@127.0.0.1:26257/bank?sslmode=disable"
        );
    }
}
