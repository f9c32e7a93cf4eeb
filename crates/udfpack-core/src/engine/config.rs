//! Engine configuration as an ordered key/value map.

use std::collections::BTreeMap;

/// Archive(s) added to the interpreter's module search path.
pub const PYTHON_FILES: &str = "python.files";

/// Interpreter used on the client while planning the job.
pub const PYTHON_CLIENT_EXECUTABLE: &str = "python.client.executable";

/// Interpreter used by the workers executing the job.
pub const PYTHON_EXECUTABLE: &str = "python.executable";

/// Engine configuration options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    options: BTreeMap<String, String>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this configuration for per-call changes.
    pub fn overlay(&self) -> Self {
        self.clone()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EngineConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            options: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
