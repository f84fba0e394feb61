//! Networking for the Pokedex explorer: URL parsing, a blocking HTTP/1.1
//! GET client, and the TLS provider abstraction.

pub mod http;
pub mod stream;
pub mod tls;
#[cfg(feature = "tls-rustls")]
pub mod tls_rustls;
pub mod url;

pub use http::{HttpOptions, HttpResponse, http_get};
pub use stream::{NetworkStream, StdNetworkStream};
pub use tls::TlsProvider;
#[cfg(feature = "tls-rustls")]
pub use tls_rustls::RustlsTlsProvider;
pub use url::Url;

#[cfg(test)]
mod tests;
