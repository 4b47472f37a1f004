use crate::{ConfigError, FromEnv, env_parse};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port the search API listens on unless `PORT` says otherwise.
pub const DEFAULT_PORT: u16 = 8000;

/// Listen address of an HTTP service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// `HOST` must be an IP literal (all interfaces when unset), `PORT` a u16.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_parse("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: env_parse("PORT", DEFAULT_PORT)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_env_listens_on_all_interfaces() {
        temp_env::with_vars([("HOST", None::<&str>), ("PORT", None::<&str>)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config, ServerConfig::default());
            assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
        });
    }

    #[test]
    fn test_host_and_port_from_env() {
        temp_env::with_vars([("HOST", Some("127.0.0.1")), ("PORT", Some("3000"))], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        });
    }

    #[test]
    fn test_hostname_is_rejected() {
        temp_env::with_vars([("HOST", Some("localhost")), ("PORT", None)], || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "HOST"));
        });
    }

    #[test]
    fn test_port_out_of_range() {
        temp_env::with_vars([("HOST", None), ("PORT", Some("99999"))], || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "PORT"));
        });
    }
}
