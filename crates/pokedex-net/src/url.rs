//! Just enough URL handling to issue HTTP/1.1 requests and follow redirects.

use std::fmt;

/// A parsed absolute `http` / `https` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    /// Always begins with `/`.
    pub path: String,
    pub query: Option<String>,
}

impl Url {
    /// Parse an absolute URL. Returns `None` for relative or malformed input.
    ///
    /// Fragments are dropped; they are never sent to the server.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (scheme, rest) = input.split_once("://")?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+') {
            return None;
        }
        let scheme = scheme.to_ascii_lowercase();

        let rest = rest.split('#').next().unwrap_or("");
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let (authority, tail) = rest.split_at(authority_end);
        if authority.is_empty() || authority.contains('@') {
            return None;
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) => (h, Some(p.parse::<u16>().ok()?)),
            None => (authority, None),
        };
        if host.is_empty() {
            return None;
        }

        let (path, query) = match tail.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string())),
            None => (tail, None),
        };
        let path = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };

        Some(Self {
            scheme,
            host: host.to_ascii_lowercase(),
            port,
            path,
            query,
        })
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }

    /// Port to connect to, falling back to the scheme default.
    pub fn effective_port(&self) -> u16 {
        self.port
            .unwrap_or(if self.is_https() { 443 } else { 80 })
    }

    /// Request target for the HTTP request line (`/path?query`).
    pub fn request_target(&self) -> String {
        match self.query {
            Some(ref q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Resolve a `Location` header value against this URL.
    ///
    /// Handles absolute URLs, scheme-relative (`//host/..`), absolute paths
    /// and paths relative to the current directory.
    pub fn resolve(&self, reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.contains("://") {
            return Self::parse(reference);
        }
        if let Some(rest) = reference.strip_prefix("//") {
            return Self::parse(&format!("{}://{rest}", self.scheme));
        }

        let (path_part, query) = match reference.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string())),
            None => (reference, None),
        };
        let path = if path_part.starts_with('/') {
            path_part.to_string()
        } else if path_part.is_empty() {
            self.path.clone()
        } else {
            let dir = match self.path.rfind('/') {
                Some(i) => &self.path[..=i],
                None => "/",
            };
            format!("{dir}{path_part}")
        };

        Some(Self {
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            port: self.port,
            path,
            query: query.or_else(|| {
                if path_part.is_empty() {
                    self.query.clone()
                } else {
                    None
                }
            }),
        })
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        write!(f, "{}", self.request_target())
    }
}
