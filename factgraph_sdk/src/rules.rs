//! # Rules
//!
//! Evaluate parsed SNMP data into pass/fail/skip results.

use crate::parsers::snmp::{SnmpdConf, TcpIpStats};
use crate::specs;
use factgraph_core::broker::Broker;
use factgraph_core::executor::ComponentError;
use factgraph_core::rules::{make_fail, make_pass, make_skip};
use factgraph_core::types::Value;
use serde_json::json;

pub const UDP_BUFFER_ERRORS: &str = "UDP_BUFFER_ERRORS";
pub const UDP_BUFFERS_OK: &str = "UDP_BUFFERS_OK";
pub const SNMPD_PUBLIC_COMMUNITY: &str = "SNMPD_PUBLIC_COMMUNITY";
pub const SNMPD_COMMUNITY_OK: &str = "SNMPD_COMMUNITY_OK";

/// Fail when UDP datagrams were dropped for lack of socket buffer space
pub fn udp_buffer_errors(broker: &Broker) -> Result<Value, ComponentError> {
    let stats: TcpIpStats = broker.get_as(&specs::TCP_IP_STATS.into())?;

    if stats.get("Udp").is_none() {
        return Ok(make_skip("no Udp counters"));
    }

    let rcvbuf = stats.counter("Udp", "RcvbufErrors").unwrap_or(0);
    let sndbuf = stats.counter("Udp", "SndbufErrors").unwrap_or(0);
    let details = json!({"RcvbufErrors": rcvbuf, "SndbufErrors": sndbuf});

    if rcvbuf > 0 || sndbuf > 0 {
        Ok(make_fail(UDP_BUFFER_ERRORS, details))
    } else {
        Ok(make_pass(UDP_BUFFERS_OK, details))
    }
}

/// Fail when a `com2sec` mapping grants access to the `public` community
pub fn snmpd_public_community(broker: &Broker) -> Result<Value, ComponentError> {
    let conf: SnmpdConf = broker.get_as(&specs::SNMPD_CONF_PARSER.into())?;

    let Some(mappings) = conf.get("com2sec") else {
        return Ok(make_skip("no com2sec directive"));
    };

    // com2sec [-Cn CONTEXT] NAME SOURCE COMMUNITY
    let public: Vec<&String> = mappings
        .iter()
        .filter(|args| args.split_whitespace().last() == Some("public"))
        .collect();

    if public.is_empty() {
        Ok(make_pass(SNMPD_COMMUNITY_OK, json!({"com2sec": mappings})))
    } else {
        Ok(make_fail(SNMPD_PUBLIC_COMMUNITY, json!({"com2sec": public})))
    }
}

#[cfg(test)]
mod tests {
    use crate::specs::{self, create_registry};
    use factgraph_core::config::CollectionPreferences;
    use factgraph_testing::Harness;
    use serde_json::json;

    fn harness() -> Harness {
        let prefs = CollectionPreferences {
            root: "/".into(),
            command_timeout_ms: 5_000,
        };
        Harness::new(create_registry(&prefs).unwrap())
    }

    #[test]
    fn test_udp_buffer_errors() {
        let harness = harness();

        let mut dropping = harness.input_data("udp");
        dropping
            .add(
                specs::PROC_SNMP_IPV4,
                "Udp: InDatagrams NoPorts InErrors OutDatagrams RcvbufErrors SndbufErrors\nUdp: 95 0 0 95 1 4",
            )
            .unwrap();
        harness
            .run_test(
                &specs::UDP_BUFFER_ERRORS_RULE.into(),
                &dropping,
                Some(&json!({
                    "type": "rule",
                    "error_key": "UDP_BUFFER_ERRORS",
                    "RcvbufErrors": 1,
                    "SndbufErrors": 4
                })),
            )
            .unwrap();

        let mut clean = harness.input_data("udp");
        clean
            .add(
                specs::PROC_SNMP_IPV4,
                "Udp: InDatagrams RcvbufErrors SndbufErrors\nUdp: 95 0 0",
            )
            .unwrap();
        let result = harness
            .integrate(&clean, &specs::UDP_BUFFER_ERRORS_RULE.into())
            .unwrap()
            .unwrap();
        assert_eq!(result["type"], "pass");
        assert_eq!(result["pass_key"], "UDP_BUFFERS_OK");
    }

    #[test]
    fn test_udp_rule_skips_without_udp() {
        let harness = harness();
        let mut input = harness.input_data("no-udp");
        input
            .add(specs::PROC_SNMP_IPV4, "Ip: Forwarding DefaultTTL\nIp: 2 64")
            .unwrap();
        let result = harness
            .integrate(&input, &specs::UDP_BUFFER_ERRORS_RULE.into())
            .unwrap()
            .unwrap();
        assert_eq!(result["type"], "skip");
    }

    #[test]
    fn test_snmpd_public_community() {
        let harness = harness();

        let mut public = harness.input_data("community");
        public
            .add(
                specs::SNMPD_CONF,
                "com2sec notConfigUser  default       public\ngroup   notConfigGroup v1 notConfigUser",
            )
            .unwrap();
        let result = harness
            .run_test(
                &specs::SNMPD_PUBLIC_COMMUNITY_RULE.into(),
                &public,
                Some(&json!({
                    "type": "rule",
                    "error_key": "SNMPD_PUBLIC_COMMUNITY",
                    "com2sec": ["notConfigUser  default       public"]
                })),
            )
            .unwrap();
        assert!(result.is_some());

        let mut private = harness.input_data("community");
        private
            .add(specs::SNMPD_CONF, "com2sec local localhost s3cr3t")
            .unwrap();
        let result = harness
            .integrate(&private, &specs::SNMPD_PUBLIC_COMMUNITY_RULE.into())
            .unwrap()
            .unwrap();
        assert_eq!(result["pass_key"], "SNMPD_COMMUNITY_OK");

        let mut absent = harness.input_data("community");
        absent.add(specs::SNMPD_CONF, "syslocation lab").unwrap();
        let result = harness
            .integrate(&absent, &specs::SNMPD_PUBLIC_COMMUNITY_RULE.into())
            .unwrap()
            .unwrap();
        assert_eq!(result["type"], "skip");
    }

    #[test]
    fn test_unparseable_config_leaves_no_result() {
        let harness = harness();
        let mut input = harness.input_data("comments");
        input
            .add(specs::SNMPD_CONF, "# sec.name  source  community")
            .unwrap();

        let broker = harness
            .run_input_data(&specs::SNMPD_PUBLIC_COMMUNITY_RULE.into(), &input)
            .unwrap();
        let traceback = broker.traceback(&specs::SNMPD_CONF_PARSER.into()).unwrap();
        assert!(traceback.message.contains("Empty Content"));
        assert!(!broker.contains(&specs::SNMPD_PUBLIC_COMMUNITY_RULE.into()));
    }
}
