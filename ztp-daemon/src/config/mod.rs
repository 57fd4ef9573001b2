//! Configuration document for the ztp daemon
//!
//! This module provides:
//! - `CoreSettings` - process-wide provisioning parameters
//! - `ZtpConfig` - the persisted document: core settings plus hosts keyed by fixed IP
//! - YAML encode/decode of the document and its parts

mod duration;

pub use duration::{format_duration, parse_duration};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{Result, ZtpError};
use crate::host::{check_hostname, HostRecord};

/// Registry type shared by the actors: fixed IP -> host
pub type HostMap = BTreeMap<String, HostRecord>;

fn default_templates_dir() -> PathBuf {
    PathBuf::from("./templates")
}

fn default_dhcp_service() -> String {
    "isc-dhcp-server".to_string()
}

fn default_restart_command() -> Vec<String> {
    vec!["systemctl".to_string(), "restart".to_string()]
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Core provisioning settings. Loaded once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreSettings {
    #[serde(default)]
    pub http_user: String,
    #[serde(default)]
    pub http_passwd: String,
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub server_port: u16,

    /// Served location of device configs, e.g. "configs"
    #[serde(default)]
    pub http_configs_location: String,
    /// Served location of images, e.g. "images"
    #[serde(default)]
    pub http_images_location: String,
    /// Directory device configs are generated into, e.g. "./configs"
    #[serde(default)]
    pub file_configs_location: PathBuf,
    /// Directory images are stored in, e.g. "./images"
    #[serde(default)]
    pub file_images_location: PathBuf,

    /// Server config file, e.g. /etc/dhcp/dhcpd.conf
    #[serde(default)]
    pub dhcpd_path: PathBuf,
    /// Interface config file, e.g. /etc/default/isc-dhcp-server
    #[serde(default)]
    pub dhcp_path: PathBuf,
    #[serde(default)]
    pub dhcp_iface: String,

    #[serde(default)]
    pub domain_name: String,
    #[serde(default)]
    pub dns_servers: Vec<String>,
    #[serde(default)]
    pub default_lease: u32,
    #[serde(default)]
    pub max_lease: u32,
    #[serde(default)]
    pub subnet: String,
    #[serde(default)]
    pub subnet_mask: String,
    #[serde(default)]
    pub non_cfg_range_low: String,
    #[serde(default)]
    pub non_cfg_range_high: String,
    #[serde(default)]
    pub subnet_router: String,
    #[serde(default)]
    pub transfer_mode: String,
    #[serde(default)]
    pub file_server: String,
    #[serde(default)]
    pub ntp_servers: Vec<String>,

    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default = "default_dhcp_service")]
    pub dhcp_service: String,
    /// Program and leading args; the service name is appended. Empty disables restarts.
    #[serde(default = "default_restart_command")]
    pub restart_command: Vec<String>,
    #[serde(
        default = "default_timeout",
        deserialize_with = "duration::deserialize_duration",
        serialize_with = "duration::serialize_duration"
    )]
    pub restart_timeout: Duration,
    #[serde(
        default = "default_timeout",
        deserialize_with = "duration::deserialize_duration",
        serialize_with = "duration::serialize_duration"
    )]
    pub request_timeout: Duration,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            http_user: String::new(),
            http_passwd: String::new(),
            server_url: String::new(),
            server_port: 0,
            http_configs_location: String::new(),
            http_images_location: String::new(),
            file_configs_location: PathBuf::new(),
            file_images_location: PathBuf::new(),
            dhcpd_path: PathBuf::new(),
            dhcp_path: PathBuf::new(),
            dhcp_iface: String::new(),
            domain_name: String::new(),
            dns_servers: Vec::new(),
            default_lease: 0,
            max_lease: 0,
            subnet: String::new(),
            subnet_mask: String::new(),
            non_cfg_range_low: String::new(),
            non_cfg_range_high: String::new(),
            subnet_router: String::new(),
            transfer_mode: String::new(),
            file_server: String::new(),
            ntp_servers: Vec::new(),
            templates_dir: default_templates_dir(),
            dhcp_service: default_dhcp_service(),
            restart_command: default_restart_command(),
            restart_timeout: default_timeout(),
            request_timeout: default_timeout(),
        }
    }
}

/// The persisted document: `{ core, hosts }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZtpConfig {
    #[serde(default)]
    pub core: CoreSettings,
    #[serde(default)]
    pub hosts: HostMap,
}

impl ZtpConfig {
    /// Maximum config file size (10MB) to prevent OOM from accidentally large files
    const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

    pub fn new(core: CoreSettings, hosts: HostMap) -> Self {
        Self { core, hosts }
    }

    /// Load and validate the document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ZtpError::ConfigNotFound(path.to_path_buf())
            } else {
                ZtpError::io(path, e)
            }
        })?;
        if metadata.len() > Self::MAX_CONFIG_FILE_SIZE {
            return Err(ZtpError::Config(format!(
                "Config file '{}' is too large ({} bytes, max {} bytes)",
                path.display(),
                metadata.len(),
                Self::MAX_CONFIG_FILE_SIZE,
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ZtpError::io(path, e))?;
        let config = Self::parse(&contents, path)?;
        config.validate(path)?;
        Ok(config)
    }

    /// Decode a document. `path` is only used for error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let de = serde_yaml::Deserializer::from_str(contents);
        let mut config: ZtpConfig =
            serde_path_to_error::deserialize(de).map_err(|e| ZtpError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        // The map key is the identity; the body's fixed_ip follows it.
        for (ip, host) in config.hosts.iter_mut() {
            host.fixed_ip = ip.clone();
        }
        Ok(config)
    }

    pub fn encode(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ZtpError::Encode(e.to_string()))
    }

    /// Validate the configuration, reporting every problem at once
    pub fn validate(&self, path: &Path) -> Result<()> {
        let mut errors = Vec::new();
        let core = &self.core;

        if core.domain_name.trim().is_empty() {
            errors.push("core.domain_name must be set".to_string());
        }
        if core.dhcpd_path.as_os_str().is_empty() {
            errors.push("core.dhcpd_path must be set".to_string());
        }
        if core.dhcp_path.as_os_str().is_empty() {
            errors.push("core.dhcp_path must be set".to_string());
        }
        if core.file_configs_location.as_os_str().is_empty() {
            errors.push("core.file_configs_location must be set".to_string());
        }
        if core.default_lease > core.max_lease {
            errors.push(format!(
                "core.default_lease ({}) exceeds core.max_lease ({})",
                core.default_lease, core.max_lease
            ));
        }
        if core.request_timeout.is_zero() {
            errors.push("core.request_timeout must be greater than zero".to_string());
        }
        if core.restart_timeout.is_zero() {
            errors.push("core.restart_timeout must be greater than zero".to_string());
        }
        for (ip, host) in &self.hosts {
            if ip.trim().is_empty() {
                errors.push("hosts: empty fixed IP key".to_string());
            }
            if let Err(reason) = check_hostname(&host.hostname) {
                errors.push(format!("hosts.{}: {}", ip, reason));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ZtpError::Config(format!(
                "Configuration errors in {}:\n  - {}",
                path.display(),
                errors.join("\n  - ")
            )))
        }
    }
}

pub fn encode_settings(core: &CoreSettings) -> Result<String> {
    serde_yaml::to_string(core).map_err(|e| ZtpError::Encode(e.to_string()))
}

pub fn encode_hosts(hosts: &HostMap) -> Result<String> {
    serde_yaml::to_string(hosts).map_err(|e| ZtpError::Encode(e.to_string()))
}
