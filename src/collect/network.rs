//! Network configuration: interfaces, resolver settings, static hosts.

use std::net::{IpAddr, SocketAddrV4, SocketAddrV6};
use std::path::Path;

use nix::ifaddrs::InterfaceAddress;
use nix::net::if_::InterfaceFlags;
use nix::sys::socket::SockaddrStorage;

use super::non_blank_lines;
use crate::fsutil::FileReadError;
use crate::source::FactSource;

pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";
pub const HOSTS_PATH: &str = "/etc/hosts";

/// Error returned when interfaces cannot be enumerated.
#[derive(Debug, thiserror::Error)]
#[error("failed to enumerate network interfaces: {0}")]
pub struct InterfaceError(#[source] nix::Error);

/// Error returned when the hostname cannot be determined.
#[derive(Debug, thiserror::Error)]
#[error("failed to get hostname: {0}")]
pub struct HostnameError(#[source] nix::Error);

/// A network interface and all of its addresses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InterfaceEntry {
    pub name: String,
    pub mtu: u32,
    pub flags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Addresses in CIDR notation.
    pub addresses: Vec<String>,
}

/// Resolver configuration from `resolv.conf(5)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
    pub nameservers: Vec<String>,
    pub search_domains: Vec<String>,
}

pub fn hostname() -> Result<String, HostnameError> {
    nix::unistd::gethostname()
        .map(|name| name.to_string_lossy().into_owned())
        .map_err(HostnameError)
}

/// Enumerates interfaces in the order the kernel reports them.
///
/// MTU is read from sysfs through `source` and reported as `0` when unavailable.
pub fn interfaces(source: &dyn FactSource) -> Result<Vec<InterfaceEntry>, InterfaceError> {
    let addrs = nix::ifaddrs::getifaddrs().map_err(InterfaceError)?;
    let mut out = group_interfaces(addrs);
    for iface in &mut out {
        iface.mtu = mtu(source, &iface.name);
    }
    Ok(out)
}

fn mtu(source: &dyn FactSource, name: &str) -> u32 {
    let path = Path::new("/sys/class/net").join(name).join("mtu");
    match source.read_file(&path) {
        Ok(text) => text.trim().parse().unwrap_or(0),
        Err(err) => {
            log::debug!("{err}");
            0
        }
    }
}

/// Folds `getifaddrs(3)` records into one entry per interface.
fn group_interfaces(addrs: impl IntoIterator<Item = InterfaceAddress>) -> Vec<InterfaceEntry> {
    let mut out: Vec<InterfaceEntry> = Vec::new();
    for addr in addrs {
        let idx = match out.iter().position(|e| e.name == addr.interface_name) {
            Some(idx) => idx,
            None => {
                out.push(InterfaceEntry {
                    name: addr.interface_name.clone(),
                    mtu: 0,
                    flags: render_flags(addr.flags),
                    mac: None,
                    addresses: Vec::new(),
                });
                out.len() - 1
            }
        };
        let entry = &mut out[idx];

        let Some(address) = addr.address.as_ref() else {
            continue;
        };
        if let Some(mac) = link_address(address) {
            entry.mac = Some(mac);
        } else if let Some(ip) = ip_address(address) {
            let prefix = addr.netmask.as_ref().and_then(ip_address).map(prefix_len);
            entry.addresses.push(match prefix {
                Some(prefix) => format!("{ip}/{prefix}"),
                None => ip.to_string(),
            });
        }
    }
    out
}

fn ip_address(addr: &SockaddrStorage) -> Option<IpAddr> {
    if let Some(v4) = addr.as_sockaddr_in() {
        return Some(IpAddr::V4(*SocketAddrV4::from(*v4).ip()));
    }
    if let Some(v6) = addr.as_sockaddr_in6() {
        return Some(IpAddr::V6(*SocketAddrV6::from(*v6).ip()));
    }
    None
}

fn link_address(addr: &SockaddrStorage) -> Option<String> {
    let link = addr.as_link_addr()?;
    let bytes = link.addr()?;
    if bytes.iter().all(|b| *b == 0) {
        return None;
    }
    Some(format_mac(&bytes))
}

fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

fn prefix_len(mask: IpAddr) -> u32 {
    match mask {
        IpAddr::V4(mask) => u32::from(mask).count_ones(),
        IpAddr::V6(mask) => u128::from(mask).count_ones(),
    }
}

const FLAG_NAMES: [(InterfaceFlags, &str); 6] = [
    (InterfaceFlags::IFF_UP, "up"),
    (InterfaceFlags::IFF_BROADCAST, "broadcast"),
    (InterfaceFlags::IFF_LOOPBACK, "loopback"),
    (InterfaceFlags::IFF_POINTOPOINT, "pointtopoint"),
    (InterfaceFlags::IFF_MULTICAST, "multicast"),
    (InterfaceFlags::IFF_RUNNING, "running"),
];

/// Renders interface flags as `|`-joined names, e.g. `up|broadcast|multicast|running`.
pub fn render_flags(flags: InterfaceFlags) -> String {
    FLAG_NAMES
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join("|")
}

pub fn dns(source: &dyn FactSource) -> Result<DnsConfig, FileReadError> {
    let text = source.read_file(Path::new(RESOLV_CONF_PATH))?;
    Ok(parse_resolv_conf(&text))
}

/// Collects every `nameserver`; each `search` line replaces the domain list.
pub fn parse_resolv_conf(text: &str) -> DnsConfig {
    let mut config = DnsConfig::default();
    for line in text.lines().map(str::trim) {
        if let Some(server) = line.strip_prefix("nameserver ") {
            config.nameservers.push(server.trim().to_owned());
        } else if let Some(domains) = line.strip_prefix("search ") {
            config.search_domains = domains.split_whitespace().map(str::to_owned).collect();
        }
    }
    config
}

pub fn hosts(source: &dyn FactSource) -> Result<Vec<String>, FileReadError> {
    let text = source.read_file(Path::new(HOSTS_PATH))?;
    Ok(parse_hosts(&text))
}

/// Keeps non-blank, non-comment lines, trimmed.
pub fn parse_hosts(text: &str) -> Vec<String> {
    non_blank_lines(text)
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::StaticSource;
    use nix::libc;
    use nix::sys::socket::SockaddrLike;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn record(
        name: &str,
        flags: InterfaceFlags,
        address: Option<SockaddrStorage>,
        netmask: Option<SockaddrStorage>,
    ) -> InterfaceAddress {
        InterfaceAddress {
            interface_name: name.to_owned(),
            flags,
            address,
            netmask,
            broadcast: None,
            destination: None,
        }
    }

    fn v4(ip: [u8; 4]) -> Option<SockaddrStorage> {
        Some(SockaddrStorage::from(SocketAddrV4::new(Ipv4Addr::from(ip), 0)))
    }

    fn v6(ip: Ipv6Addr) -> Option<SockaddrStorage> {
        Some(SockaddrStorage::from(SocketAddrV6::new(ip, 0, 0, 0)))
    }

    fn link(mac: [u8; 6]) -> Option<SockaddrStorage> {
        // SAFETY: sockaddr_ll is plain old data; zeroed is a valid value.
        let mut sll: libc::sockaddr_ll = unsafe { std::mem::zeroed() };
        sll.sll_family = libc::AF_PACKET as libc::c_ushort;
        sll.sll_halen = 6;
        sll.sll_addr[..6].copy_from_slice(&mac);
        let len = std::mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t;
        // SAFETY: `sll` is a fully initialized sockaddr_ll of length `len`.
        unsafe {
            SockaddrStorage::from_raw(
                (&sll as *const libc::sockaddr_ll).cast::<libc::sockaddr>(),
                Some(len),
            )
        }
    }

    #[test]
    fn test_parse_resolv_conf_last_search_wins() {
        let text = "\
# generated by resolvconf
nameserver 10.0.0.2
search corp.example old.example
nameserver 8.8.8.8
  search  svc.cluster.local cluster.local
options ndots:5
";
        let config = parse_resolv_conf(text);
        assert_eq!(config.nameservers, vec!["10.0.0.2", "8.8.8.8"]);
        assert_eq!(
            config.search_domains,
            vec!["svc.cluster.local", "cluster.local"]
        );
    }

    #[test]
    fn test_parse_resolv_conf_empty() {
        let config = parse_resolv_conf("");
        assert!(config.nameservers.is_empty());
        assert!(config.search_domains.is_empty());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"nameservers": [], "searchDomains": []})
        );
    }

    #[test]
    fn test_parse_hosts_skips_blank_and_comments() {
        let text = "\
# static table
127.0.0.1\tlocalhost

::1 localhost ip6-localhost
   # indented comment
172.17.0.3\tweb.internal web
";
        assert_eq!(
            parse_hosts(text),
            vec![
                "127.0.0.1\tlocalhost",
                "::1 localhost ip6-localhost",
                "172.17.0.3\tweb.internal web",
            ]
        );
    }

    #[test]
    fn test_dns_and_hosts_missing_files() {
        let source = StaticSource::new();
        assert!(dns(&source).is_err());
        assert!(hosts(&source).is_err());
    }

    #[test]
    fn test_render_flags() {
        let flags = InterfaceFlags::IFF_UP
            | InterfaceFlags::IFF_BROADCAST
            | InterfaceFlags::IFF_RUNNING
            | InterfaceFlags::IFF_MULTICAST;
        assert_eq!(render_flags(flags), "up|broadcast|multicast|running");
        assert_eq!(render_flags(InterfaceFlags::empty()), "");
    }

    #[test]
    fn test_prefix_len() {
        assert_eq!(prefix_len(IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0))), 24);
        assert_eq!(prefix_len(IpAddr::V4(Ipv4Addr::new(255, 0, 0, 0))), 8);
        assert_eq!(
            prefix_len(IpAddr::V6(Ipv6Addr::new(0xffff, 0xffff, 0xffff, 0xffff, 0, 0, 0, 0))),
            64
        );
    }

    #[test]
    fn test_format_mac() {
        assert_eq!(
            format_mac(&[0x02, 0x42, 0xac, 0x11, 0x00, 0x03]),
            "02:42:ac:11:00:03"
        );
    }

    #[test]
    fn test_mtu_from_sysfs() {
        let source = StaticSource::new().with_file("/sys/class/net/eth0/mtu", "1500\n");
        assert_eq!(mtu(&source, "eth0"), 1500);
        assert_eq!(mtu(&source, "eth1"), 0);
    }

    #[test]
    fn test_group_interfaces() {
        let lo_flags =
            InterfaceFlags::IFF_UP | InterfaceFlags::IFF_LOOPBACK | InterfaceFlags::IFF_RUNNING;
        let eth_flags = InterfaceFlags::IFF_UP
            | InterfaceFlags::IFF_BROADCAST
            | InterfaceFlags::IFF_MULTICAST
            | InterfaceFlags::IFF_RUNNING;
        let records = vec![
            record("lo", lo_flags, link([0; 6]), None),
            record("eth0", eth_flags, link([0x02, 0x42, 0xac, 0x11, 0x00, 0x03]), None),
            record("lo", lo_flags, v4([127, 0, 0, 1]), v4([255, 0, 0, 0])),
            record("eth0", eth_flags, v4([172, 17, 0, 3]), v4([255, 255, 0, 0])),
            record("lo", lo_flags, v6(Ipv6Addr::LOCALHOST), v6(Ipv6Addr::from(u128::MAX))),
            record("eth0", eth_flags, v6("fe80::42:acff:fe11:3".parse().unwrap()), None),
            record("eth0", eth_flags, None, None),
        ];

        assert_eq!(
            group_interfaces(records),
            vec![
                InterfaceEntry {
                    name: "lo".into(),
                    mtu: 0,
                    flags: "up|loopback|running".into(),
                    mac: None,
                    addresses: vec!["127.0.0.1/8".into(), "::1/128".into()],
                },
                InterfaceEntry {
                    name: "eth0".into(),
                    mtu: 0,
                    flags: "up|broadcast|multicast|running".into(),
                    mac: Some("02:42:ac:11:00:03".into()),
                    addresses: vec!["172.17.0.3/16".into(), "fe80::42:acff:fe11:3".into()],
                },
            ]
        );
    }

    #[test]
    fn test_interfaces_are_idempotent() {
        let source = StaticSource::new();
        assert_eq!(interfaces(&source).unwrap(), interfaces(&source).unwrap());
    }

    #[test]
    fn test_interfaces_are_unique() {
        let ifaces = interfaces(&StaticSource::new()).unwrap();
        let mut names: Vec<_> = ifaces.iter().map(|i| i.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ifaces.len());
    }

    #[test]
    fn test_hostname_is_not_empty() {
        let name = hostname().unwrap();
        assert!(!name.is_empty());
    }
}
