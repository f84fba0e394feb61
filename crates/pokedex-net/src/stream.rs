//! Byte stream abstraction shared by plain TCP and TLS connections.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use pokedex_types::error::FetchError;

/// A bidirectional byte stream (plain TCP or TLS-wrapped).
pub trait NetworkStream: Send {
    /// Read into `buf`. `Ok(0)` means the peer closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write from `data`, returning how many bytes were accepted.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Close the stream.
    fn close(&mut self) -> io::Result<()>;
}

/// [`NetworkStream`] over a blocking `std::net::TcpStream`.
pub struct StdNetworkStream {
    inner: TcpStream,
}

impl StdNetworkStream {
    pub fn new(inner: TcpStream) -> Self {
        Self { inner }
    }
}

impl NetworkStream for StdNetworkStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.inner.write(data)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.inner.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// Open a TCP connection with connect and read timeouts applied.
pub fn tcp_connect(
    host: &str,
    port: u16,
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<TcpStream, FetchError> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|e| FetchError::Transport(format!("DNS resolution failed: {e}")))?
        .next()
        .ok_or_else(|| FetchError::Transport(format!("no addresses for {host}:{port}")))?;

    let stream = TcpStream::connect_timeout(&addr, connect_timeout)
        .map_err(|e| FetchError::Transport(format!("TCP connect failed: {e}")))?;

    stream
        .set_read_timeout(Some(read_timeout))
        .map_err(|e| FetchError::Transport(format!("set read timeout: {e}")))?;

    Ok(stream)
}

// ---------------------------------------------------------------------------
// NetworkStream -> std::io adapter
// ---------------------------------------------------------------------------

/// Lets `std::io` consumers (rustls, the HTTP reader) drive a
/// `&mut dyn NetworkStream`.
pub struct StreamIo<'a> {
    inner: &'a mut dyn NetworkStream,
}

impl<'a> StreamIo<'a> {
    pub fn new(inner: &'a mut dyn NetworkStream) -> Self {
        Self { inner }
    }
}

impl Read for StreamIo<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for StreamIo<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
