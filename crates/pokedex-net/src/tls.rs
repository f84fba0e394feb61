//! TLS provider abstraction.
//!
//! The HTTP client upgrades a plain [`NetworkStream`] through a
//! [`TlsProvider`] so it never depends on a concrete TLS library.

use std::io;

use crate::stream::NetworkStream;

/// Provides TLS client connections.
pub trait TlsProvider: Send + Sync {
    /// Wrap `stream` in a TLS client session, performing the handshake.
    ///
    /// `server_name` is used for SNI and certificate verification.
    fn connect_tls(
        &self,
        stream: Box<dyn NetworkStream>,
        server_name: &str,
    ) -> io::Result<Box<dyn NetworkStream>>;
}
