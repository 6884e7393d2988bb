use serde::{Deserialize, Serialize};

/// Configuration for the employee_directory module
/// (`modules.employee_directory` in the application config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Re-validate every write inside the engine and reject bad records.
    #[serde(default)]
    pub strict_mode: bool,
    /// Fill an empty store with sample employees on first start.
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            strict_mode: false,
            seed_sample_data: default_seed_sample_data(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    1000
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_storage_key() -> String {
    "employee_directory_data".to_string()
}
