use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Value;

use super::paths::AppPaths;

const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash-preview-05-20";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
const DEFAULT_FEEDBACK_API_BASE: &str = "https://fashion-store-backend-u0pj.onrender.com";

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("FASHION_ASSISTANT_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        self.paths.project_root.join("config.yml")
    }

    pub fn load_config(&self) -> Value {
        load_yaml_file(&self.config_path())
    }

    /// Gemini API key. Environment wins over the config file.
    pub fn google_api_key(&self) -> Option<String> {
        env_or_config("GOOGLE_API_KEY", &self.load_config(), &["models", "google_api_key"])
    }

    /// Tavily API key. Environment wins over the config file.
    pub fn tavily_api_key(&self) -> Option<String> {
        env_or_config("TAVILY_API_KEY", &self.load_config(), &["tools", "tavily_api_key"])
    }

    pub fn chat_model(&self) -> String {
        lookup_str(&self.load_config(), &["models", "chat_model"])
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string())
    }

    pub fn embedding_model(&self) -> String {
        lookup_str(&self.load_config(), &["models", "embedding_model"])
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string())
    }

    /// Base URL of the store backend that owns the feedback records.
    pub fn feedback_api_base(&self) -> String {
        env_or_config("FEEDBACK_API_URL", &self.load_config(), &["feedback", "api_base"])
            .unwrap_or_else(|| DEFAULT_FEEDBACK_API_BASE.to_string())
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        let config = self.load_config();
        let origins = lookup(&config, &["server", "cors_allowed_origins"])
            .and_then(|value| value.as_sequence())
            .map(|list| {
                list.iter()
                    .filter_map(|item| item.as_str())
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| item.to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if origins.is_empty() {
            return default_local_origins();
        }

        origins
    }
}

fn env_or_config(env_key: &str, config: &Value, path: &[&str]) -> Option<String> {
    if let Ok(value) = env::var(env_key) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }

    lookup_str(config, path)
}

fn lookup<'a>(config: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = config;
    for key in path {
        current = current.get(*key)?;
    }
    Some(current)
}

fn lookup_str(config: &Value, path: &[&str]) -> Option<String> {
    lookup(config, path)
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

fn load_yaml_file(path: &Path) -> Value {
    if !path.exists() {
        return Value::Mapping(Default::default());
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<Value>(&contents) {
            Ok(value) => match value {
                Value::Mapping(_) => value,
                _ => Value::Mapping(Default::default()),
            },
            Err(_) => Value::Mapping(Default::default()),
        },
        Err(_) => Value::Mapping(Default::default()),
    }
}

pub fn default_local_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_empty_mapping() {
        let value = load_yaml_file(Path::new("/nonexistent/config.yml"));
        assert!(matches!(value, Value::Mapping(_)));
        assert!(lookup_str(&value, &["models", "chat_model"]).is_none());
    }

    #[test]
    fn lookup_reads_nested_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "models:\n  chat_model: gemini-test\ntools:\n  tavily_api_key: tvly-abc").unwrap();

        let value = load_yaml_file(&path);
        assert_eq!(
            lookup_str(&value, &["models", "chat_model"]).as_deref(),
            Some("gemini-test")
        );
        assert_eq!(
            lookup_str(&value, &["tools", "tavily_api_key"]).as_deref(),
            Some("tvly-abc")
        );
        assert!(lookup_str(&value, &["tools", "missing"]).is_none());
    }

    #[test]
    fn non_mapping_yaml_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "- just\n- a\n- list\n").unwrap();

        let value = load_yaml_file(&path);
        assert!(matches!(value, Value::Mapping(_)));
    }

    #[test]
    fn blank_config_values_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "models:\n  chat_model: \"   \"\n").unwrap();

        let value = load_yaml_file(&path);
        assert!(lookup_str(&value, &["models", "chat_model"]).is_none());
    }
}
