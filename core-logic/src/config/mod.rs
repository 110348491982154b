use serde::{Deserialize, Serialize};

/// Outbound proxy transport, detected from the URI prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyScheme {
    Http,
    Socks4,
    Socks5,
    /// Anything else. Kept in the pool so index assignment stays stable;
    /// the HTTP client degrades these to a direct connection.
    Unsupported,
}

impl ProxyScheme {
    pub fn detect(uri: &str) -> Self {
        if uri.starts_with("http://") {
            ProxyScheme::Http
        } else if uri.starts_with("socks4://") {
            ProxyScheme::Socks4
        } else if uri.starts_with("socks5://") {
            ProxyScheme::Socks5
        } else {
            ProxyScheme::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ProxyScheme::Unsupported)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyEndpoint {
    pub scheme: ProxyScheme,
    pub url: String,
}

impl ProxyEndpoint {
    pub fn parse(uri: &str) -> Self {
        Self {
            scheme: ProxyScheme::detect(uri),
            url: uri.to_string(),
        }
    }
}
