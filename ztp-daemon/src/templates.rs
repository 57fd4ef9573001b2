//! Per-vendor device configuration templates.
//!
//! Each recognized vendor maps to a minijinja template under the configured
//! templates directory. Templates are read from disk on every render so an
//! edited template takes effect on the next publish.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::CoreSettings;
use crate::errors::{Result, ZtpError};
use crate::host::HostRecord;
use crate::persistence::write_file_atomic;

/// Vendors with a device template. Add a variant and a template file to
/// support another vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Junos,
}

impl Vendor {
    /// Case-insensitive lookup of a host's vendor tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "junos" => Some(Vendor::Junos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Junos => "junos",
        }
    }

    /// Template path relative to the templates directory
    pub fn template_name(&self) -> &'static str {
        match self {
            Vendor::Junos => "junos/junos.template",
        }
    }
}

/// Values available to a device template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceTemplatePayload {
    pub gateway: String,
    pub fixed_ip: String,
    pub hostname: String,
    pub domain_name: String,
    pub dns_servers: Vec<String>,
    pub ntp_servers: Vec<String>,
}

impl DeviceTemplatePayload {
    pub fn new(core: &CoreSettings, host: &HostRecord) -> Self {
        Self {
            gateway: core.subnet_router.clone(),
            fixed_ip: host.fixed_ip.clone(),
            hostname: host.hostname.clone(),
            domain_name: core.domain_name.clone(),
            dns_servers: core.dns_servers.clone(),
            ntp_servers: core.ntp_servers.clone(),
        }
    }
}

pub struct TemplateRenderer {
    templates_dir: PathBuf,
    env: Environment<'static>,
}

impl TemplateRenderer {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        Self {
            templates_dir: templates_dir.into(),
            env,
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    pub fn template_path(&self, vendor: Vendor) -> PathBuf {
        self.templates_dir.join(vendor.template_name())
    }

    pub fn render(&self, vendor: Vendor, payload: &DeviceTemplatePayload) -> Result<String> {
        let path = self.template_path(vendor);
        let source = std::fs::read_to_string(&path).map_err(|e| ZtpError::io(&path, e))?;
        self.render_source(vendor.template_name(), &source, payload)
    }

    /// Render template text that is already in memory
    pub fn render_source(
        &self,
        name: &str,
        source: &str,
        payload: &DeviceTemplatePayload,
    ) -> Result<String> {
        self.env
            .render_named_str(name, source, payload)
            .map_err(|e| ZtpError::Template {
                template: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Render and replace the device config at `dest`.
    pub fn write_device_config(
        &self,
        vendor: Vendor,
        payload: &DeviceTemplatePayload,
        dest: &Path,
    ) -> Result<()> {
        let text = self.render(vendor, payload)?;
        write_file_atomic(dest, text.as_bytes())?;
        debug!("Rendered {} config for {} to {:?}", vendor.as_str(), payload.hostname, dest);
        Ok(())
    }
}
