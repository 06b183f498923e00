// Listener module
// Creates the TCP listener the server accepts connections on

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use crate::logger;

/// Backlog queue size passed to `listen(2)`
const LISTEN_BACKLOG: i32 = 128;

/// Create a `TcpListener` bound to `addr`.
///
/// `SO_REUSEADDR` is enabled so a restart is not blocked by sockets in
/// `TIME_WAIT`. `SO_REUSEPORT` is not: a second process binding the same
/// port must fail with `AddrInUse`. An IPv6 wildcard address also accepts
/// IPv4 connections where the platform allows it.
///
/// Must be called from within a Tokio runtime.
pub fn create_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    if addr.is_ipv6() {
        // Some platforms refuse dual-stack sockets; IPv6-only still works
        if let Err(e) = socket.set_only_v6(false) {
            logger::log_warning(&format!(
                "Could not enable IPv4 on {addr}, accepting IPv6 only: {e}"
            ));
        }
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ephemeral_port() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_ipv6_listener() {
        // Hosts without IPv6 cannot run this
        let listener = match create_listener("[::1]:0".parse().unwrap()) {
            Ok(listener) => listener,
            Err(e) if e.kind() == std::io::ErrorKind::AddrNotAvailable => return,
            Err(e) => panic!("unexpected bind error: {e}"),
        };
        let addr = listener.local_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_second_bind_fails() {
        let first = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = first.local_addr().unwrap();

        let err = create_listener(addr).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);

        // The first listener is untouched
        assert_eq!(first.local_addr().unwrap(), addr);
    }
}
