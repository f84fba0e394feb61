//! [`TlsProvider`] backed by rustls + ring.
//!
//! Enabled by the `tls-rustls` feature.

use std::io::{self, Read, Write};
use std::sync::Arc;

use rustls::ClientConfig;
use rustls_pki_types::ServerName;

use crate::stream::{NetworkStream, StreamIo};
use crate::tls::TlsProvider;

/// Shared, reusable TLS client configuration (one per process).
pub struct RustlsTlsProvider {
    config: Arc<ClientConfig>,
}

impl RustlsTlsProvider {
    /// Build a provider that trusts Mozilla's root CA bundle.
    pub fn new() -> Self {
        let root_store =
            rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for RustlsTlsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsProvider for RustlsTlsProvider {
    fn connect_tls(
        &self,
        stream: Box<dyn NetworkStream>,
        server_name: &str,
    ) -> io::Result<Box<dyn NetworkStream>> {
        let sni = ServerName::try_from(server_name.to_owned()).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid server name: {e}"))
        })?;

        let conn = rustls::ClientConnection::new(Arc::clone(&self.config), sni)
            .map_err(|e| io::Error::other(format!("TLS init: {e}")))?;

        Ok(Box::new(RustlsStream::handshake(conn, stream)?))
    }
}

// ---------------------------------------------------------------------------
// Adapter: drive a rustls session over a NetworkStream
// ---------------------------------------------------------------------------

/// A TLS-wrapped network stream.
struct RustlsStream {
    tls: rustls::ClientConnection,
    inner: Box<dyn NetworkStream>,
}

impl RustlsStream {
    /// Complete the handshake before handing the stream to callers.
    fn handshake(
        mut tls: rustls::ClientConnection,
        mut inner: Box<dyn NetworkStream>,
    ) -> io::Result<Self> {
        {
            let mut io = StreamIo::new(&mut *inner);
            while tls.is_handshaking() {
                let (rd, wr) = tls.complete_io(&mut io)?;
                if rd == 0 && wr == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "TLS handshake: peer closed connection",
                    ));
                }
            }
        }
        log::trace!("TLS handshake complete");
        Ok(Self { tls, inner })
    }

    /// Flush any pending ciphertext to the network.
    fn flush_tls(&mut self) -> io::Result<()> {
        let mut io = StreamIo::new(&mut *self.inner);
        while self.tls.wants_write() {
            self.tls.write_tls(&mut io)?;
        }
        Ok(())
    }
}

impl NetworkStream for RustlsStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.tls.reader().read(buf) {
                Ok(n) => return Ok(n),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {},
                // Peer closed the socket without close_notify.
                Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(0),
                Err(e) => return Err(e),
            }

            // No plaintext buffered: pull more ciphertext off the wire.
            let mut io = StreamIo::new(&mut *self.inner);
            if self.tls.read_tls(&mut io)? == 0 {
                return Ok(0);
            }
            self.tls
                .process_new_packets()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            // Post-handshake messages (session tickets) may need a reply.
            self.flush_tls()?;
        }
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let n = self.tls.writer().write(data)?;
        self.flush_tls()?;
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        self.tls.send_close_notify();
        let _ = self.flush_tls();
        self.inner.close()
    }
}
