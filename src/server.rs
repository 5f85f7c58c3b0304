use crate::config::get_config;
use std::net::Ipv4Addr;
use tokio::net::TcpListener;

/// Ports scanned when no fixed port is configured.
pub const PORT_RANGE: std::ops::RangeInclusive<u16> = 3000..=3099;

/// Bind the HTTP listener on the configured port, or on the first free port in [`PORT_RANGE`].
///
/// Returns the listener together with the port it actually bound (a configured port of `0` asks
/// the OS for an ephemeral one).
pub async fn bind_listener() -> Result<(TcpListener, u16), std::io::Error> {
    let config = get_config();
    if let Some(port) = config.server_port {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
        let bound = listener.local_addr()?.port();
        return Ok((listener, bound));
    }

    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        format!(
            "No available port found in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG, Config};

    #[tokio::test]
    async fn configured_port_comes_from_global_config() {
        let _ = CONFIG.set(Config {
            server_port: Some(0),
            ..Config::default()
        });

        let (listener, port) = bind_listener().await.expect("bind");
        assert_ne!(port, 0);
        assert_eq!(listener.local_addr().expect("addr").port(), port);
    }
}
