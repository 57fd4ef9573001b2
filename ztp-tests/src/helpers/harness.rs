//! Test harness running both actors against a temp directory

use std::path::{Path, PathBuf};
use ztp_daemon::{CoreSettings, HostMap, ZtpConfig, ZtpRuntime, ZtpService};

/// Junos template installed by the harness
pub const JUNOS_TEMPLATE: &str = "\
system {
    host-name {{ hostname }};
    domain-name {{ domain_name }};
    name-server {
{%- for server in dns_servers %}
        {{ server }};
{%- endfor %}
    }
    ntp {
{%- for server in ntp_servers %}
        server {{ server }};
{%- endfor %}
    }
}
interfaces {
    vme {
        unit 0 {
            family inet {
                address {{ fixed_ip }};
            }
        }
    }
}
routing-options {
    static {
        route 0.0.0.0/0 next-hop {{ gateway }};
    }
}
";

/// Runs the inventory and responder actors with every artifact under one directory
pub struct TestZtpHarness {
    runtime: ZtpRuntime,
    pub config_path: PathBuf,
    pub core: CoreSettings,
}

impl TestZtpHarness {
    /// Write the junos template and the document, then spawn both actors
    pub async fn new(core: CoreSettings, hosts: HostMap, dir: &Path) -> std::io::Result<Self> {
        Self::install_template(&core, JUNOS_TEMPLATE)?;

        let config_path = dir.join("config.yaml");
        let config = ZtpConfig::new(core, hosts);
        let yaml = config.encode().map_err(std::io::Error::other)?;
        std::fs::write(&config_path, yaml)?;

        Self::from_file(&config_path).await
    }

    /// Load an existing document the way the binary does
    pub async fn from_file(config_path: &Path) -> std::io::Result<Self> {
        let config = ZtpConfig::load(config_path).map_err(std::io::Error::other)?;
        let core = config.core.clone();
        let runtime = ZtpRuntime::spawn(config, config_path.to_path_buf());
        Ok(Self {
            runtime,
            config_path: config_path.to_path_buf(),
            core,
        })
    }

    pub fn install_template(core: &CoreSettings, body: &str) -> std::io::Result<()> {
        let path = core.templates_dir.join("junos").join("junos.template");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, body)
    }

    pub fn service(&self) -> &ZtpService {
        self.runtime.service()
    }

    pub fn device_config_path(&self, hostname: &str) -> PathBuf {
        ztp_daemon::host::device_config_path(&self.core.file_configs_location, hostname)
    }

    pub fn read_server_config(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.core.dhcpd_path)
    }

    pub fn read_interface_config(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.core.dhcp_path)
    }

    pub fn read_document(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.config_path)
    }

    pub async fn shutdown(self) {
        self.runtime.shutdown().await;
    }
}
