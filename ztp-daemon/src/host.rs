//! Host records held in the inventory

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::config::CoreSettings;
use crate::errors::{Result, ZtpError};

/// A single provisioned device, keyed by its fixed IP address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    #[serde(default)]
    pub fixed_ip: String,
    #[serde(default)]
    pub ethernet: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub vendor: String,
    /// Served path of the generated device config. Derived at publish time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfg_file: Option<String>,
    /// Image file name; becomes the served image path at publish time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfg_image: Option<String>,
}

impl HostRecord {
    pub fn new(
        fixed_ip: impl Into<String>,
        ethernet: impl Into<String>,
        hostname: impl Into<String>,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            fixed_ip: fixed_ip.into(),
            ethernet: ethernet.into(),
            hostname: hostname.into(),
            vendor: vendor.into(),
            cfg_file: None,
            cfg_image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.cfg_image = Some(image.into());
        self
    }

    /// Lower-case the vendor tag, as every inbound record is stored.
    pub fn normalized(mut self) -> Self {
        self.vendor = self.vendor.trim().to_lowercase();
        self
    }

    /// A record may only live in the registry with a fixed IP and a
    /// hostname that `check_hostname` accepts.
    pub fn validate(&self) -> Result<()> {
        if self.fixed_ip.trim().is_empty() {
            return Err(ZtpError::InvalidHost(format!(
                "host '{}' has no fixed IP address",
                self.hostname
            )));
        }
        check_hostname(&self.hostname)
            .map_err(|reason| ZtpError::InvalidHost(format!("{}: {}", self.fixed_ip, reason)))
    }

    /// Return a copy with `cfg_file`/`cfg_image` prefixed by the served
    /// locations. Only the last component of an existing image value is
    /// kept, so deriving twice yields the same result.
    pub fn with_derived_paths(&self, core: &CoreSettings) -> Self {
        let mut derived = self.clone();
        derived.cfg_file = Some(join_served(
            &core.http_configs_location,
            &format!("{}.conf", self.hostname),
        ));
        derived.cfg_image = self
            .cfg_image
            .as_deref()
            .and_then(image_file_name)
            .map(|name| join_served(&core.http_images_location, name));
        derived
    }

    /// On-disk location of this host's generated device config.
    pub fn device_config_path(&self, file_configs_location: &Path) -> PathBuf {
        device_config_path(file_configs_location, &self.hostname)
    }
}

/// The hostname names `<hostname>.conf` under the configs directory, so it
/// must be one plain path component.
pub fn check_hostname(hostname: &str) -> std::result::Result<(), String> {
    if hostname.trim().is_empty() {
        return Err("hostname must be set".to_string());
    }
    if hostname.contains(['/', '\\']) {
        return Err(format!("hostname '{}' must not contain path separators", hostname));
    }
    if hostname.contains("..") {
        return Err(format!("hostname '{}' must not contain '..'", hostname));
    }
    let mut components = Path::new(hostname).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(format!("hostname '{}' is not a plain file name", hostname)),
    }
}

/// `<dir>/<hostname>.conf`
pub fn device_config_path(file_configs_location: &Path, hostname: &str) -> PathBuf {
    file_configs_location.join(format!("{}.conf", hostname))
}

fn image_file_name(image: &str) -> Option<&str> {
    let name = image.rsplit('/').next().unwrap_or(image).trim();
    (!name.is_empty()).then_some(name)
}

fn join_served(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}
