//! SNMP statistics and agent configuration
//!
//! * [`TcpIpStats`]: `/proc/net/snmp`
//! * [`TcpIpStatsIPV6`]: `/proc/net/snmp6`
//! * [`SnmpdConf`]: `/etc/snmp/snmpd.conf`

use super::{ParseError, Parser};
use factgraph_core::types::ContentRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// IPv4 protocol counters grouped by protocol.
///
/// The file holds pairs of lines sharing a `Proto:` prefix, the first naming
/// the counters and the second giving their values:
///
/// ```text
/// Udp: InDatagrams NoPorts InErrors OutDatagrams RcvbufErrors SndbufErrors
/// Udp: 95 0 0 95 1 4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TcpIpStats {
    protocols: BTreeMap<String, BTreeMap<String, i64>>,
}

impl TcpIpStats {
    /// Counters for one protocol, e.g. `Ip` or `Udp`
    pub fn get(&self, protocol: &str) -> Option<&BTreeMap<String, i64>> {
        self.protocols.get(protocol)
    }

    /// A single counter
    pub fn counter(&self, protocol: &str, name: &str) -> Option<i64> {
        self.get(protocol).and_then(|counters| counters.get(name).copied())
    }

    pub fn protocols(&self) -> impl Iterator<Item = &str> {
        self.protocols.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}

impl Parser for TcpIpStats {
    fn parse(record: &ContentRecord) -> Result<Self, ParseError> {
        let mut protocols = BTreeMap::new();
        let mut pending: Option<(&str, Vec<&str>)> = None;

        for (index, line) in record.lines().into_iter().enumerate() {
            let Some((protocol, rest)) = line.split_once(':') else {
                continue;
            };
            let protocol = protocol.trim();
            let fields: Vec<&str> = rest.split_whitespace().collect();

            match pending.take() {
                Some((header, names)) if header == protocol => {
                    let mut counters = BTreeMap::new();
                    for (name, raw) in names.into_iter().zip(fields) {
                        let value = raw.parse::<i64>().map_err(|e| ParseError::InvalidValue {
                            line: index + 1,
                            reason: format!("{} {}: {}", protocol, name, e),
                        })?;
                        counters.insert(name.to_string(), value);
                    }
                    protocols.insert(protocol.to_string(), counters);
                }
                _ => pending = Some((protocol, fields)),
            }
        }

        Ok(Self { protocols })
    }
}

/// IPv6 counters, one `Name<whitespace>Value` pair per line.
/// Lines without a value are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TcpIpStatsIPV6 {
    counters: BTreeMap<String, i64>,
}

impl TcpIpStatsIPV6 {
    pub fn get(&self, name: &str) -> Option<i64> {
        self.counters.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

impl Parser for TcpIpStatsIPV6 {
    fn parse(record: &ContentRecord) -> Result<Self, ParseError> {
        let mut counters = BTreeMap::new();

        for (index, line) in record.lines().into_iter().enumerate() {
            let mut fields = line.split_whitespace();
            let (Some(name), Some(raw)) = (fields.next(), fields.next()) else {
                continue;
            };
            let value = raw.parse::<i64>().map_err(|e| ParseError::InvalidValue {
                line: index + 1,
                reason: format!("{}: {}", name, e),
            })?;
            counters.insert(name.to_string(), value);
        }

        Ok(Self { counters })
    }
}

/// `snmpd.conf` directives mapped to the arguments of each occurrence.
///
/// Arguments keep their internal spacing. A directive given without
/// arguments maps to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnmpdConf {
    directives: BTreeMap<String, Vec<String>>,
}

impl SnmpdConf {
    pub fn get(&self, directive: &str) -> Option<&[String]> {
        self.directives.get(directive).map(Vec::as_slice)
    }

    pub fn contains(&self, directive: &str) -> bool {
        self.directives.contains_key(directive)
    }

    pub fn directives(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.directives
            .iter()
            .map(|(name, args)| (name.as_str(), args.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

impl std::ops::Index<&str> for SnmpdConf {
    type Output = [String];

    fn index(&self, directive: &str) -> &[String] {
        self.get(directive).unwrap_or(&[])
    }
}

impl Parser for SnmpdConf {
    fn parse(record: &ContentRecord) -> Result<Self, ParseError> {
        let mut directives: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for line in record.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (directive, args) = match line.split_once(char::is_whitespace) {
                Some((directive, args)) => (directive, Some(args.trim_start())),
                None => (line, None),
            };
            let list = directives.entry(directive.to_string()).or_default();
            if let Some(args) = args {
                list.push(args.to_string());
            }
        }

        if directives.is_empty() {
            return Err(ParseError::EmptyContent);
        }

        Ok(Self { directives })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::specs::{self, create_registry};
    use factgraph_core::config::CollectionPreferences;
    use factgraph_testing::{context_wrap, Harness};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn harness() -> Harness {
        let prefs = CollectionPreferences {
            root: "/".into(),
            command_timeout_ms: 5_000,
        };
        Harness::new(create_registry(&prefs).unwrap())
    }

    const PROC_SNMP: &str = "
Ip: Forwarding DefaultTTL InReceives InHdrErrors InAddrErrors ForwDatagrams InUnknownProtos InDiscards InDelivers OutRequests OutDiscards OutNoRoutes ReasmTimeout ReasmReqds ReasmOKs ReasmFails FragOKs FragFails FragCreates
Ip: 2 64 2628 0 2 0 0 0 2624 1618 0 0 0 0 0 10 0 0 0
Icmp: InMsgs InErrors InDestUnreachs InTimeExcds InParmProbs InSrcQuenchs InRedirects InEchos InEchoReps InTimestamps InTimestampReps InAddrMasks InAddrMaskReps OutMsgs OutErrors OutDestUnreachs OutTimeExcds OutParmProbs OutSrcQuenchs OutRedirects OutEchos OutEchoReps OutTimestamps OutTimestampReps OutAddrMasks OutAddrMaskReps
Icmp: 0 0 0 0 0 0 0 0 0 0 0 0 0 2 0 2 0 0 0 0 0 0 0 0 0 0
IcmpMsg: InType3 OutType3
IcmpMsg: 34 44
Tcp: RtoAlgorithm RtoMin RtoMax MaxConn ActiveOpens PassiveOpens AttemptFails EstabResets CurrEstab InSegs OutSegs RetransSegs InErrs OutRsts
Tcp: 1 200 120000 -1 25 4 0 0 1 2529 1520 1 0 9
Udp: InDatagrams NoPorts InErrors OutDatagrams RcvbufErrors SndbufErrors
Udp: 95 0 0 95 1 4
UdpLite: InDatagrams NoPorts InErrors OutDatagrams RcvbufErrors SndbufErrors
UdpLite: 0 10 0 0 0 100
";

    const PROC_SNMP6: &str = "
Ip6InReceives                   \t757
Ip6InHdrErrors                  \t0
Ip6InTooBigErrors               \t0
Ip6InDiscards                   \t0
Ip6InDelivers                   \t748
Ip6OutRequests                  \t713
Ip6InOctets                     \t579410
Ip6OutOctets                    \t1553244
Icmp6InMsgs                     \t94
Icmp6InRouterAdvertisements     \t62
Icmp6OutMLDv2Reports            \t34
Icmp6OutType143                 \t34
Udp6InDatagrams                 \t0
UdpLite6InCsumErrors            \t0
";

    const PROC_SNMP6_ODD: &str = "
Ip6InReceives                   \t757
Ip6InHdrErrors                  \t0
Icmp6OutMLDv2Reports            \t0
Icmp6InType130                  \t28
Icmp6InType134                  \t62
Ip6InDiscards
";

    const SNMPD_CONF: &str = r#"
#       sec.name  source          community
com2sec notConfigUser  default       public

#       groupName      securityModel securityName
group   notConfigGroup v1           notConfigUser
group   notConfigGroup v2c           notConfigUser

# Make at least  snmpwalk -v 1 localhost -c public system fast again.
#       name           incl/excl     subtree         mask(optional)
view    systemview    included   .1.3.6.1.2.1.1
view    systemview    included   .1.3.6.1.2.1.25.1.1

#       group          context sec.model sec.level prefix read   write  notif
access  notConfigGroup ""      any       noauth    exact  systemview none none

dontLogTCPWrappersConnects yes
include_ifmib_iface_prefix eth enp1s0
leave_pidfile

syscontact Root <root@localhost> (configure /etc/snmp/snmp.local.conf)
"#;

    #[test]
    fn test_snmp() {
        let stats = TcpIpStats::parse(&context_wrap(PROC_SNMP)).unwrap();

        let ip = stats.get("Ip").unwrap();
        assert_eq!(ip["DefaultTTL"], 64);
        assert_eq!(ip["InReceives"], 2628);
        assert_eq!(ip["InHdrErrors"], 0);
        assert_eq!(ip["InAddrErrors"], 2);
        assert_eq!(ip["InDiscards"], 0);
        assert_eq!(ip["InDelivers"], 2624);
        assert_eq!(ip["ReasmFails"], 10);
        assert_eq!(ip["OutRequests"], 1618);

        let tcp = stats.get("Tcp").unwrap();
        assert_eq!(tcp["RtoMax"], 120000);
        assert_eq!(tcp["MaxConn"], -1);
        assert_eq!(tcp["OutSegs"], 1520);
        assert_eq!(tcp["ActiveOpens"], 25);

        assert_eq!(stats.counter("IcmpMsg", "OutType3"), Some(44));

        let udp = stats.get("Udp").unwrap();
        assert_eq!(udp["OutDatagrams"], 95);
        assert_eq!(udp["RcvbufErrors"], 1);
        assert_eq!(udp["NoPorts"], 0);
        assert_eq!(stats.counter("UdpLite", "SndbufErrors"), Some(100));

        let protocols: Vec<&str> = stats.protocols().collect();
        assert_eq!(protocols, vec!["Icmp", "IcmpMsg", "Ip", "Tcp", "Udp", "UdpLite"]);
    }

    #[test]
    fn test_snmp_empty() {
        let stats = TcpIpStats::parse(&context_wrap("")).unwrap();
        assert!(stats.get("Ip").is_none());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_snmp_bad_counter() {
        let result = TcpIpStats::parse(&context_wrap("Udp: InDatagrams NoPorts\nUdp: 95 lots"));
        assert_matches!(result, Err(ParseError::InvalidValue { line: 2, .. }));
    }

    #[test]
    fn test_snmp6() {
        let stats = TcpIpStatsIPV6::parse(&context_wrap(PROC_SNMP6)).unwrap();
        assert_eq!(stats.get("Ip6InReceives"), Some(757));
        assert_eq!(stats.get("Icmp6OutMLDv2Reports"), Some(34));
        assert_eq!(stats.len(), 14);

        let odd = TcpIpStatsIPV6::parse(&context_wrap(PROC_SNMP6_ODD)).unwrap();
        assert_eq!(odd.get("Ip6InDiscards"), None);
        assert_eq!(odd.get("some_unknown"), None);
        assert_eq!(odd.get("Icmp6InType134"), Some(62));
    }

    #[test]
    fn test_snmpd_conf() {
        let conf = SnmpdConf::parse(&context_wrap(SNMPD_CONF)).unwrap();
        assert_eq!(conf.len(), 8);
        assert!(conf.contains("com2sec"));
        assert_eq!(conf["group"][0], "notConfigGroup v1           notConfigUser");
        assert_eq!(conf["group"][1], "notConfigGroup v2c           notConfigUser");
        assert!(conf["leave_pidfile"].is_empty());
        assert_eq!(
            conf.get("access").unwrap(),
            &[r#"notConfigGroup ""      any       noauth    exact  systemview none none"#.to_string()]
        );
        assert_eq!(
            conf.get("syscontact").unwrap(),
            &["Root <root@localhost> (configure /etc/snmp/snmp.local.conf)".to_string()]
        );
        assert_eq!(conf["view"].len(), 2);
    }

    #[test]
    fn test_snmpd_conf_empty() {
        let result = SnmpdConf::parse(&context_wrap(""));
        assert_matches!(result, Err(ParseError::EmptyContent));

        let comments_only = "#       sec.name  source          community";
        let error = SnmpdConf::parse(&context_wrap(comments_only)).unwrap_err();
        assert_eq!(error.to_string(), "Empty Content");
    }

    #[test]
    fn test_serialized_shape() {
        let conf = SnmpdConf::parse(&context_wrap("leave_pidfile\nsyslocation lab")).unwrap();
        assert_eq!(
            serde_json::to_value(&conf).unwrap(),
            serde_json::json!({"leave_pidfile": [], "syslocation": ["lab"]})
        );
    }

    #[test]
    fn test_tcp_ip_stats_through_graph() {
        let harness = harness();
        let mut input = harness.input_data("snmp");
        input.add(specs::PROC_SNMP_IPV4, PROC_SNMP).unwrap();

        let result = harness
            .integrate(&input, &specs::TCP_IP_STATS.into())
            .unwrap()
            .unwrap();
        assert_eq!(result["Ip"]["DefaultTTL"], 64);
        assert_eq!(result["Ip"]["InReceives"], 2628);
        assert_eq!(result["Udp"]["RcvbufErrors"], 1);
    }

    #[test]
    fn test_snmpd_conf_through_graph() {
        let harness = harness();
        let mut input = harness.input_data("snmpd");
        input
            .add(
                specs::SNMPD_CONF,
                "group g v1 user\ngroup g v2c user\nleave_pidfile\n# comment\n",
            )
            .unwrap();
        harness
            .run_test(
                &specs::SNMPD_CONF_PARSER.into(),
                &input,
                Some(&json!({
                    "group": ["g v1 user", "g v2c user"],
                    "leave_pidfile": []
                })),
            )
            .unwrap();

        let mut empty = harness.input_data("snmpd");
        empty.add(specs::SNMPD_CONF, "# nothing here").unwrap();
        let result = harness
            .integrate(&empty, &specs::SNMPD_CONF_PARSER.into())
            .unwrap();
        assert!(result.is_none());
    }
}
