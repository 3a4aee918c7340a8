//! # Spec catalogue
//!
//! Identifiers of every component shipped by this crate and the registry
//! wiring them together.

use crate::datasources::{
    create_command_executor, CommandOutput, GlobFile, HostContextProvider, LeappReport,
    MigrationResults, SimpleFile, HOST_CONTEXT,
};
use crate::parsers::snmp::{SnmpdConf, TcpIpStats, TcpIpStatsIPV6};
use crate::parsers::ParserComponent;
use crate::rules;
use factgraph_core::config::CollectionPreferences;
use factgraph_core::registry::{from_fn, ComponentRegistry, Dependencies, RegistryError};
use factgraph_core::types::ComponentMetadata;
use std::time::Duration;

// Specs
pub const HOSTNAME: &str = "specs.hostname";
pub const REDHAT_RELEASE: &str = "specs.redhat_release";
pub const UNAME: &str = "specs.uname";
pub const PROC_SNMP_IPV4: &str = "specs.proc_snmp_ipv4";
pub const PROC_SNMP_IPV6: &str = "specs.proc_snmp_ipv6";
pub const SNMPD_CONF: &str = "specs.snmpd_conf";
pub const SNMP_CONF_FILES: &str = "specs.snmp_conf_files";
pub const LEAPP_REPORT: &str = "specs.leapp_report";
pub const MIGRATION_RESULTS: &str = "specs.leapp_migration_results";

// Parsers
pub const TCP_IP_STATS: &str = "parsers.snmp.TcpIpStats";
pub const TCP_IP_STATS_IPV6: &str = "parsers.snmp.TcpIpStatsIPV6";
pub const SNMPD_CONF_PARSER: &str = "parsers.snmp.SnmpdConf";

// Rules
pub const UDP_BUFFER_ERRORS_RULE: &str = "rules.udp_buffer_errors";
pub const SNMPD_PUBLIC_COMMUNITY_RULE: &str = "rules.snmpd_public_community";

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Create a registry with every component in the catalogue
///
/// Includes:
/// - Host context rooted at `prefs.root`
/// - File and command specs (SNMP statistics, snmpd configuration, release)
/// - Leapp datasources (inhibitors, migration results)
/// - SNMP parsers and the rules built on them
pub fn create_registry(prefs: &CollectionPreferences) -> Result<ComponentRegistry, CatalogueError> {
    let mut registry = ComponentRegistry::new();
    let on_host = || Dependencies::requires([HOST_CONTEXT]);
    let executor = create_command_executor(Duration::from_millis(prefs.command_timeout_ms));

    registry.register(
        HOST_CONTEXT,
        ComponentMetadata::context().with_description("Filesystem root and hostname"),
        Dependencies::none(),
        HostContextProvider::new(&prefs.root),
    )?;

    // Command specs
    registry.register(
        HOSTNAME,
        ComponentMetadata::spec().with_description("hostname -f"),
        on_host(),
        CommandOutput::new(executor.clone(), "hostname", &["-f"]),
    )?;
    registry.register(
        UNAME,
        ComponentMetadata::spec().with_description("uname -a"),
        on_host(),
        CommandOutput::new(executor, "uname", &["-a"]),
    )?;

    // File specs
    let files = [
        (REDHAT_RELEASE, "/etc/redhat-release"),
        (PROC_SNMP_IPV4, "/proc/net/snmp"),
        (PROC_SNMP_IPV6, "/proc/net/snmp6"),
        (SNMPD_CONF, "/etc/snmp/snmpd.conf"),
    ];
    for (id, path) in files {
        registry.register(
            id,
            ComponentMetadata::spec().with_description(path),
            on_host(),
            SimpleFile::new(path),
        )?;
    }

    registry.register(
        SNMP_CONF_FILES,
        ComponentMetadata::spec()
            .multi_output()
            .with_description("/etc/snmp/*.conf"),
        on_host(),
        GlobFile::new("/etc/snmp", r"\.conf$")?,
    )?;

    // Datasources
    registry.register(
        LEAPP_REPORT,
        ComponentMetadata::datasource()
            .raw()
            .with_description("Inhibitors from leapp-report.json"),
        on_host(),
        LeappReport,
    )?;
    registry.register(
        MIGRATION_RESULTS,
        ComponentMetadata::datasource()
            .raw()
            .with_description("Activities from /etc/migration-results"),
        on_host(),
        MigrationResults,
    )?;

    // Parsers
    registry.register(
        TCP_IP_STATS,
        ComponentMetadata::parser(),
        Dependencies::requires([PROC_SNMP_IPV4]),
        ParserComponent::<TcpIpStats>::new(PROC_SNMP_IPV4),
    )?;
    registry.register(
        TCP_IP_STATS_IPV6,
        ComponentMetadata::parser(),
        Dependencies::requires([PROC_SNMP_IPV6]),
        ParserComponent::<TcpIpStatsIPV6>::new(PROC_SNMP_IPV6),
    )?;
    registry.register(
        SNMPD_CONF_PARSER,
        ComponentMetadata::parser(),
        Dependencies::requires([SNMPD_CONF]),
        ParserComponent::<SnmpdConf>::new(SNMPD_CONF),
    )?;

    // Rules
    registry.register(
        UDP_BUFFER_ERRORS_RULE,
        ComponentMetadata::rule(),
        Dependencies::requires([TCP_IP_STATS]),
        from_fn(rules::udp_buffer_errors),
    )?;
    registry.register(
        SNMPD_PUBLIC_COMMUNITY_RULE,
        ComponentMetadata::rule(),
        Dependencies::requires([SNMPD_CONF_PARSER]),
        from_fn(rules::snmpd_public_community),
    )?;

    Ok(registry)
}
