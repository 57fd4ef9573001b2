//! Programmatic settings and host creation with builder pattern

use std::path::{Path, PathBuf};
use std::time::Duration;
use ztp_daemon::{CoreSettings, HostRecord};

/// Builder for core settings whose every path lives under one root directory
pub struct TestSettingsBuilder {
    core: CoreSettings,
}

impl TestSettingsBuilder {
    /// Settings for a 10.0.0.0/24 provisioning network rooted at `root`.
    /// Restarts are disabled until `with_restart_command` is called.
    pub fn new(root: &Path) -> Self {
        Self {
            core: CoreSettings {
                http_user: "ztp".into(),
                http_passwd: "ztp".into(),
                server_url: "http://10.0.0.2".into(),
                server_port: 8080,
                http_configs_location: "configs".into(),
                http_images_location: "images".into(),
                file_configs_location: root.join("configs"),
                file_images_location: root.join("images"),
                dhcpd_path: root.join("dhcpd.conf"),
                dhcp_path: root.join("isc-dhcp-server"),
                dhcp_iface: "eth1".into(),
                domain_name: "example.com".into(),
                dns_servers: vec!["8.8.8.8".into(), "8.8.4.4".into()],
                default_lease: 600,
                max_lease: 7200,
                subnet: "10.0.0.0".into(),
                subnet_mask: "255.255.255.0".into(),
                non_cfg_range_low: "10.0.0.100".into(),
                non_cfg_range_high: "10.0.0.200".into(),
                subnet_router: "10.0.0.1".into(),
                transfer_mode: "http".into(),
                file_server: "10.0.0.2".into(),
                ntp_servers: vec!["10.0.0.3".into()],
                templates_dir: root.join("templates"),
                restart_command: Vec::new(),
                request_timeout: Duration::from_secs(5),
                restart_timeout: Duration::from_secs(5),
                ..CoreSettings::default()
            },
        }
    }

    pub fn with_domain(mut self, domain: &str) -> Self {
        self.core.domain_name = domain.to_string();
        self
    }

    pub fn with_interface(mut self, iface: &str) -> Self {
        self.core.dhcp_iface = iface.to_string();
        self
    }

    pub fn with_configs_dir(mut self, dir: PathBuf) -> Self {
        self.core.file_configs_location = dir;
        self
    }

    /// `command` gets the service name appended when publish restarts dhcpd
    pub fn with_restart_command(mut self, command: Vec<String>, service: &str) -> Self {
        self.core.restart_command = command;
        self.core.dhcp_service = service.to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.core.request_timeout = timeout;
        self
    }

    pub fn build(self) -> CoreSettings {
        self.core
    }
}

/// Builder for host records
pub struct TestHostBuilder {
    host: HostRecord,
}

impl TestHostBuilder {
    /// A junos host with a MAC derived from the last octet of `fixed_ip`
    pub fn new(fixed_ip: &str, hostname: &str) -> Self {
        let last_octet: u8 = fixed_ip
            .rsplit('.')
            .next()
            .and_then(|octet| octet.parse().ok())
            .unwrap_or(0);
        Self {
            host: HostRecord::new(
                fixed_ip,
                format!("00:11:22:33:44:{:02x}", last_octet),
                hostname,
                "junos",
            ),
        }
    }

    pub fn with_vendor(mut self, vendor: &str) -> Self {
        self.host.vendor = vendor.to_string();
        self
    }

    pub fn with_ethernet(mut self, mac: &str) -> Self {
        self.host.ethernet = mac.to_string();
        self
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.host.cfg_image = Some(image.to_string());
        self
    }

    pub fn build(self) -> HostRecord {
        self.host
    }
}
