use crate::db::writer::bookshelf::{DEFAULT_NET_BATCH_SIZE, DEFAULT_NODE_BATCH_SIZE};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    // None seeds from entropy
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_node_batch_size")]
    pub node_batch_size: usize,
    #[serde(default = "default_net_batch_size")]
    pub net_batch_size: usize,
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            node_batch_size: default_node_batch_size(),
            net_batch_size: default_net_batch_size(),
            user: default_user(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

fn default_node_batch_size() -> usize {
    DEFAULT_NODE_BATCH_SIZE
}

fn default_net_batch_size() -> usize {
    DEFAULT_NET_BATCH_SIZE
}

fn default_user() -> String {
    "Example User".to_string()
}

fn default_base_dir() -> String {
    "benchmarks".to_string()
}
