use anyhow::Context;

use getset::Getters;

use log::info;

use serde::{Deserialize, Serialize};

use tokio::{fs::File, io::AsyncReadExt};

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub enum ServerType {
    TCP,
    UNIX,
}

#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct FastCGIConnectionConfiguration {
    max_concurrent_connections: u8,
    max_requests_per_connection: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct ServerConfiguration {
    server_type: ServerType,
    bind_address: String,
    fastcgi_connection_configuration: FastCGIConnectionConfiguration,
}

pub const DEFAULT_TREE_PAYLOAD: &str = "hello world";

pub const DEFAULT_REWRITE_ARGS: &str = "state=xxxxxxxxxxxxxxxxxxxxxxx";

pub const DEFAULT_ACCESS_ARGS: &str = "response_type=code&redirect_uri=http://192.168.80.160:8383/github/callback&client_id=6086dc8afc3f6cc9b5cf&state=1234567899";

fn default_tree_payload() -> String {
    DEFAULT_TREE_PAYLOAD.to_string()
}

fn default_rewrite_args() -> String {
    DEFAULT_REWRITE_ARGS.to_string()
}

fn default_access_args() -> String {
    DEFAULT_ACCESS_ARGS.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct TreeConfiguration {
    #[serde(default = "default_tree_payload")]
    payload: String,
    #[serde(default = "default_rewrite_args")]
    rewrite_args: String,
    #[serde(default = "default_access_args")]
    access_args: String,
}

impl Default for TreeConfiguration {
    fn default() -> Self {
        Self {
            payload: default_tree_payload(),
            rewrite_args: default_rewrite_args(),
            access_args: default_access_args(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationMatch {
    Exact,
    #[default]
    Prefix,
}

#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct LocationConfiguration {
    path: String,
    #[serde(default, rename = "match")]
    location_match: LocationMatch,
    #[serde(default)]
    directives: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct Configuration {
    server_configuration: ServerConfiguration,
    #[serde(default)]
    tree_configuration: TreeConfiguration,
    #[serde(default)]
    locations: Vec<LocationConfiguration>,
}

pub async fn read_configuration(config_file: String) -> anyhow::Result<Configuration> {
    info!("reading {}", config_file);

    let mut file = File::open(&config_file)
        .await
        .with_context(|| format!("error opening config file '{}'", config_file))?;

    let mut file_contents = Vec::new();

    file.read_to_end(&mut file_contents)
        .await
        .with_context(|| format!("error reading config file '{}'", config_file))?;

    let configuration: Configuration = ::serde_json::from_slice(&file_contents)
        .with_context(|| format!("error unmarshalling config file '{}'", config_file))?;

    info!("configuration\n{:#?}", configuration);

    Ok(configuration)
}

#[cfg(test)]
impl LocationConfiguration {
    pub fn new(path: &str, location_match: LocationMatch, directives: &[&str]) -> Self {
        Self {
            path: path.to_string(),
            location_match,
            directives: directives.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "server_configuration": {
            "server_type": "UNIX",
            "bind_address": "/tmp/tree.sock",
            "fastcgi_connection_configuration": {
                "max_concurrent_connections": 10,
                "max_requests_per_connection": 10
            }
        }
    }"#;

    #[test]
    fn tree_configuration_defaults_when_absent() {
        let configuration: Configuration = serde_json::from_str(MINIMAL).unwrap();

        let tree = configuration.tree_configuration();
        assert_eq!(tree.payload(), "hello world");
        assert_eq!(tree.rewrite_args(), DEFAULT_REWRITE_ARGS);
        assert_eq!(tree.access_args(), DEFAULT_ACCESS_ARGS);
        assert!(configuration.locations().is_empty());
    }

    #[test]
    fn partial_tree_configuration_keeps_other_defaults() {
        let tree: TreeConfiguration = serde_json::from_str(r#"{"payload": "bonsai"}"#).unwrap();

        assert_eq!(tree.payload(), "bonsai");
        assert_eq!(tree.rewrite_args(), DEFAULT_REWRITE_ARGS);
    }

    #[test]
    fn location_match_defaults_to_prefix() {
        let location: LocationConfiguration =
            serde_json::from_str(r#"{"path": "/tree", "directives": ["tree"]}"#).unwrap();
        assert_eq!(*location.location_match(), LocationMatch::Prefix);
        assert_eq!(location.directives(), &vec!["tree".to_string()]);

        let location: LocationConfiguration =
            serde_json::from_str(r#"{"path": "/tree", "match": "exact"}"#).unwrap();
        assert_eq!(*location.location_match(), LocationMatch::Exact);
        assert!(location.directives().is_empty());
    }

    #[tokio::test]
    async fn read_configuration_reports_missing_file() {
        let err = read_configuration("/nonexistent/tree.json".to_string())
            .await
            .unwrap_err();

        assert!(format!("{}", err).contains("error opening config file"));
    }
}
