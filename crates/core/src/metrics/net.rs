use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, UdpSocket};

use crate::error::MetricsError;

/// Public resolver used only for route lookup; no packet is sent to it.
pub const PUBLIC_PROBE_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 80));

/// Address of the local interface the kernel would route `target` through.
///
/// Connecting a UDP socket only resolves the route, so this works offline as
/// long as a route exists.
pub fn local_ip_toward(target: SocketAddr) -> Result<IpAddr, MetricsError> {
    let bind: SocketAddr = match target {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(bind)?;
    socket.connect(target)?;
    let ip = socket.local_addr()?.ip();
    if ip.is_unspecified() {
        return Err(MetricsError::Other("no route to probe address".to_string()));
    }
    Ok(ip)
}

/// Number of sockets in a `/proc/net/tcp{,6}` table: one row per socket
/// after the header line.
pub fn count_tcp_entries(table: &str) -> usize {
    table
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .count()
}

#[cfg(target_os = "linux")]
pub(crate) fn tcp_connection_count() -> Result<usize, MetricsError> {
    let v4 = std::fs::read_to_string("/proc/net/tcp")?;
    // tcp6 is missing when IPv6 is disabled
    let v6 = std::fs::read_to_string("/proc/net/tcp6").unwrap_or_default();
    Ok(count_tcp_entries(&v4) + count_tcp_entries(&v6))
}

#[cfg(target_os = "macos")]
pub(crate) fn tcp_connection_count() -> Result<usize, MetricsError> {
    let output = std::process::Command::new("netstat")
        .args(["-an", "-p", "tcp"])
        .output()?;
    if !output.status.success() {
        return Err(MetricsError::Other(format!(
            "netstat exited with {}",
            output.status
        )));
    }
    Ok(count_netstat_rows(&String::from_utf8_lossy(&output.stdout)))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub(crate) fn tcp_connection_count() -> Result<usize, MetricsError> {
    Err(MetricsError::Unsupported("TCP connection table"))
}

#[cfg(any(target_os = "macos", test))]
fn count_netstat_rows(output: &str) -> usize {
    output
        .lines()
        .filter(|line| line.starts_with("tcp"))
        .count()
}
