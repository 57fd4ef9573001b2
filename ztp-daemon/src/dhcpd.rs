//! ISC dhcpd text generation.
//!
//! Pure renderers for the interface defaults file, the server config and the
//! per-host stanzas embedded in it. Nothing here touches the filesystem; the
//! caller supplies the generation timestamp so output is reproducible.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::config::CoreSettings;
use crate::host::HostRecord;

/// Prefix of the only line that varies between two renders of the same input.
pub const TIMESTAMP_PREFIX: &str = "# Timestamp: ";

/// dhcpd directive labels, one per rendered settings/host field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Interfaces,
    DomainName,
    DomainNameServers,
    DefaultLeaseTime,
    MaxLeaseTime,
    Routers,
    FileServer,
    TransferMode,
    NtpServers,
    HardwareEthernet,
    FixedAddress,
    HostName,
    ConfigFileName,
    ImageFileName,
}

impl Directive {
    pub const fn label(self) -> &'static str {
        match self {
            Directive::Interfaces => "INTERFACESv4",
            Directive::DomainName => "option domain-name",
            Directive::DomainNameServers => "option domain-name-servers",
            Directive::DefaultLeaseTime => "default-lease-time",
            Directive::MaxLeaseTime => "max-lease-time",
            Directive::Routers => "option routers",
            Directive::FileServer => "option ezjunosztp-file-server",
            Directive::TransferMode => "option ezjunosztp.transfer-mode",
            Directive::NtpServers => "option ntp-servers",
            Directive::HardwareEthernet => "hardware ethernet",
            Directive::FixedAddress => "fixed-address",
            Directive::HostName => "option host-name",
            Directive::ConfigFileName => "option ezjunosztp.config-file-name",
            Directive::ImageFileName => "option ezjunosztp.image-file-name",
        }
    }
}

const SERVER_PREAMBLE: &str = "\
# The ddns-updates-style parameter controls whether or not the server will
# attempt to do a DNS update when a lease is confirmed.
ddns-update-style none;

# This is the official DHCP server for the provisioning network.
authoritative;

log-facility local7;

# Junos ZTP vendor options
option space ezjunosztp;
option ezjunosztp.image-file-name code 0 = text;
option ezjunosztp.config-file-name code 1 = text;
option ezjunosztp.image-file-type code 2 = text;
option ezjunosztp.transfer-mode code 3 = text;
option ezjunosztp-encap code 43 = encapsulate ezjunosztp;
option ezjunosztp-file-server code 150 = ip-address;
";

fn format_timestamp(generated_at: DateTime<Utc>) -> String {
    generated_at.format("%Y-%m-%d %H:%M:%S%.6f %Z").to_string()
}

fn header(file: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "# {}\n#\n# Generated by ztp-daemon, do not edit.\n#\n{}{}\n",
        file,
        TIMESTAMP_PREFIX,
        format_timestamp(generated_at)
    )
}

/// Render the isc-dhcp-server defaults file binding dhcpd to the interface.
pub fn render_interface_config(core: &CoreSettings, generated_at: DateTime<Utc>) -> String {
    let mut out = header(&core.dhcp_path.display().to_string(), generated_at);
    out.push_str("#\n# Interfaces the DHCP server (dhcpd) serves requests on.\n\n");
    let _ = writeln!(out, "{}=\"{}\"", Directive::Interfaces.label(), core.dhcp_iface);
    out
}

/// Render the full dhcpd.conf. Hosts are emitted in the order given.
pub fn render_server_config<'a, I>(core: &CoreSettings, hosts: I, generated_at: DateTime<Utc>) -> String
where
    I: IntoIterator<Item = &'a HostRecord>,
{
    let mut out = header(&core.dhcpd_path.display().to_string(), generated_at);
    out.push('\n');
    out.push_str(SERVER_PREAMBLE);
    out.push('\n');

    let _ = writeln!(out, "{} \"{}\";", Directive::DomainName.label(), core.domain_name);
    let _ = writeln!(
        out,
        "{} {};",
        Directive::DomainNameServers.label(),
        core.dns_servers.join(", ")
    );
    let _ = writeln!(out, "{} {};", Directive::DefaultLeaseTime.label(), core.default_lease);
    let _ = writeln!(out, "{} {};", Directive::MaxLeaseTime.label(), core.max_lease);

    out.push('\n');
    out.push_str(&render_subnet(core));

    out.push_str("\ngroup {\n");
    let _ = writeln!(out, "\t{} {};", Directive::FileServer.label(), core.file_server);
    let _ = writeln!(out, "\t{} \"{}\";", Directive::TransferMode.label(), core.transfer_mode);
    let _ = writeln!(
        out,
        "\t{} {};",
        Directive::NtpServers.label(),
        core.ntp_servers.join(", ")
    );
    for host in hosts {
        out.push('\n');
        out.push_str(&render_host_stanza(host, &core.domain_name));
    }
    out.push_str("}\n");
    out
}

fn render_subnet(core: &CoreSettings) -> String {
    format!(
        "# Subnet definition\nsubnet {} netmask {} {{\n\trange dynamic-bootp {} {};\n\t{} {};\n}}\n",
        core.subnet,
        core.subnet_mask,
        core.non_cfg_range_low,
        core.non_cfg_range_high,
        Directive::Routers.label(),
        core.subnet_router,
    )
}

/// Render one host block, indented for placement inside the group block.
pub fn render_host_stanza(host: &HostRecord, domain: &str) -> String {
    let mut out = String::new();
    out.push_str("\t# Host definition\n");
    let _ = writeln!(out, "\thost {}.{} {{", host.hostname, domain);
    let _ = writeln!(out, "\t\t{} {};", Directive::HardwareEthernet.label(), host.ethernet);
    let _ = writeln!(out, "\t\t{} {};", Directive::FixedAddress.label(), host.fixed_ip);
    let _ = writeln!(out, "\t\t{} \"{}\";", Directive::HostName.label(), host.hostname);
    if let Some(cfg_file) = host.cfg_file.as_deref().filter(|f| !f.is_empty()) {
        let _ = writeln!(out, "\t\t{} \"{}\";", Directive::ConfigFileName.label(), cfg_file);
    }
    if let Some(image) = host.cfg_image.as_deref().filter(|i| !i.is_empty()) {
        let _ = writeln!(out, "\t\t{} \"{}\";", Directive::ImageFileName.label(), image);
    }
    out.push_str("\t}\n");
    out
}

/// Drop the timestamp line so two renders can be compared.
pub fn strip_timestamp(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with(TIMESTAMP_PREFIX))
        .map(|line| format!("{}\n", line))
        .collect()
}
