//! File-based configuration provider (JSON or YAML).

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::OnceCell;

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

/// Loads the file lazily on first access; a missing file reads as empty.
pub struct FileConfigProvider {
    path: PathBuf,
    data: OnceCell<Value>,
}

impl FileConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        )
    }

    async fn load(&self) -> ConfigResult<Value> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Value::Object(Default::default()));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        if self.is_yaml() {
            serde_yaml_bw::from_str(&content).map_err(|e| ConfigError::Provider {
                message: format!("{}: {}", self.path.display(), e),
            })
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    async fn data(&self) -> ConfigResult<&Value> {
        self.data.get_or_try_init(|| self.load()).await
    }
}

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |node, part| node.get(part))
}

fn collect_keys(node: &Value, path: &str, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (k, v) in map {
                let next = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", path, k)
                };
                collect_keys(v, &next, out);
            }
        }
        _ => out.push(path.to_string()),
    }
}

#[async_trait::async_trait]
impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        let data = self.data().await?;
        Ok(match lookup(data, key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(v) => Some(v.to_string()),
        })
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let mut keys = Vec::new();
        collect_keys(self.data().await?, "", &mut keys);
        keys.retain(|k| k.starts_with(prefix));
        Ok(keys)
    }
}
