use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tracing::{info, warn};

/// Address a local browser can reach the server on.
/// Wildcard listen addresses are swapped for loopback.
pub fn viewer_url(local: SocketAddr) -> String {
    let ip = match local.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}", SocketAddr::new(ip, local.port()))
}

/// Opens `url` in the default browser. A failure is only logged.
pub fn open(url: &str) -> bool {
    open_with(url, webbrowser::open)
}

fn open_with<F>(url: &str, opener: F) -> bool
where
    F: FnOnce(&str) -> std::io::Result<()>,
{
    match opener(url) {
        Ok(()) => {
            info!(%url, "opened map viewer in browser");
            true
        }
        Err(e) => {
            warn!(%url, "failed to open browser: {e}");
            false
        }
    }
}
