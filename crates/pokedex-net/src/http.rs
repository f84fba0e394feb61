//! Minimal HTTP/1.1 GET client.
//!
//! Supports plain HTTP over `std::net::TcpStream` and, when a
//! [`TlsProvider`] is supplied, HTTPS. Every request uses
//! `Connection: close` and reads until EOF.

use std::io::{self, Read, Write};
use std::time::Duration;

use pokedex_types::error::FetchError;

use crate::stream::{NetworkStream, StdNetworkStream, StreamIo, tcp_connect};
use crate::tls::TlsProvider;
use crate::url::Url;

/// Maximum response body size (8 MB).
const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: u8 = 5;

type Result<T> = std::result::Result<T, FetchError>;

/// Per-request settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(15),
            user_agent: concat!("pokedex/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A parsed HTTP response.
#[derive(Debug)]
pub struct HttpResponse {
    /// URL the response was finally served from (after redirects).
    pub url: String,
    /// HTTP status code (e.g. 200, 404).
    pub status_code: u16,
    /// Response headers as (lowercased name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Perform an HTTP(S) GET request.
///
/// Follows redirects (301/302/307/308) up to [`MAX_REDIRECTS`] hops. Any
/// other status, including errors, is returned to the caller as-is.
pub fn http_get(
    url: &str,
    tls: Option<&dyn TlsProvider>,
    options: &HttpOptions,
) -> Result<HttpResponse> {
    let mut current =
        Url::parse(url).ok_or_else(|| FetchError::Transport(format!("invalid URL: {url}")))?;

    for _ in 0..=MAX_REDIRECTS {
        if current.scheme != "http" && current.scheme != "https" {
            return Err(FetchError::Transport(format!(
                "unsupported scheme for HTTP client: {}",
                current.scheme,
            )));
        }

        log::debug!("GET {current}");
        let mut resp = do_request(&current, tls, options)?;
        log::debug!(
            "{} -> HTTP {} ({} bytes)",
            current,
            resp.status_code,
            resp.body.len()
        );

        if is_redirect(resp.status_code)
            && let Some(location) = resp.header("location")
        {
            let location = location.to_string();
            current = current.resolve(&location).ok_or_else(|| {
                FetchError::Transport(format!("bad redirect Location: {location}"))
            })?;
            continue;
        }

        resp.url = current.to_string();
        return Ok(resp);
    }

    Err(FetchError::Transport("too many redirects".to_string()))
}

// -------------------------------------------------------------------
// Internals
// -------------------------------------------------------------------

/// Connect, optionally upgrade to TLS, send GET, read and parse.
fn do_request(
    url: &Url,
    tls: Option<&dyn TlsProvider>,
    options: &HttpOptions,
) -> Result<HttpResponse> {
    let tcp = tcp_connect(
        &url.host,
        url.effective_port(),
        options.connect_timeout,
        options.read_timeout,
    )?;
    let plain: Box<dyn NetworkStream> = Box::new(StdNetworkStream::new(tcp));

    let mut stream = if url.is_https() {
        let provider =
            tls.ok_or_else(|| FetchError::Transport("TLS not available".to_string()))?;
        provider
            .connect_tls(plain, &url.host)
            .map_err(|e| FetchError::Transport(format!("TLS handshake with {}: {e}", url.host)))?
    } else {
        plain
    };

    let mut io = StreamIo::new(&mut *stream);
    send_request(&mut io, url, options)?;
    let raw = read_response(&mut io)?;
    let _ = stream.close();
    parse_response(&raw)
}

/// Send an HTTP/1.1 GET request.
fn send_request(stream: &mut impl Write, url: &Url, options: &HttpOptions) -> Result<()> {
    let host_header = match url.port {
        Some(p) if p != default_port(url) => format!("{}:{p}", url.host),
        _ => url.host.clone(),
    };

    let request = format!(
        "GET {target} HTTP/1.1\r\n\
         Host: {host_header}\r\n\
         User-Agent: {agent}\r\n\
         Accept: application/json\r\n\
         Connection: close\r\n\
         \r\n",
        target = url.request_target(),
        agent = options.user_agent,
    );

    stream
        .write_all(request.as_bytes())
        .map_err(|e| FetchError::Transport(format!("send request: {e}")))
}

fn default_port(url: &Url) -> u16 {
    if url.is_https() { 443 } else { 80 }
}

/// Read the entire response until EOF or until the read timeout fires.
fn read_response(stream: &mut impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() + n > MAX_BODY_SIZE + 4096 {
                    return Err(FetchError::Transport("response too large".to_string()));
                }
                buf.extend_from_slice(&chunk[..n]);
            },
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                if buf.is_empty() {
                    return Err(FetchError::Transport("read timed out".to_string()));
                }
                break;
            },
            Err(e) => {
                return Err(FetchError::Transport(format!("read response: {e}")));
            },
        }
    }
    Ok(buf)
}

/// Parse raw bytes into status code, headers, and body.
pub fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = find_subsequence(data, b"\r\n\r\n").ok_or_else(|| {
        FetchError::Transport("malformed HTTP response: no header terminator".to_string())
    })?;

    let header_str = std::str::from_utf8(&data[..header_end])
        .map_err(|_| FetchError::Transport("non-UTF-8 headers".to_string()))?;
    let mut lines = header_str.split("\r\n");

    let status_line = lines
        .next()
        .ok_or_else(|| FetchError::Transport("empty response".to_string()))?;
    let status_code = parse_status_line(status_line)?;

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    let raw_body = &data[header_end + 4..];
    let body = if find_header(&headers, "transfer-encoding").is_some_and(|v| v.contains("chunked"))
    {
        decode_chunked(raw_body)?
    } else if let Some(cl) = find_header(&headers, "content-length") {
        let len: usize = cl
            .parse()
            .map_err(|_| FetchError::Transport("bad Content-Length".to_string()))?;
        if len > MAX_BODY_SIZE {
            return Err(FetchError::Transport(
                "response body exceeds 8 MB limit".to_string(),
            ));
        }
        raw_body[..raw_body.len().min(len)].to_vec()
    } else {
        raw_body.to_vec()
    };

    if body.len() > MAX_BODY_SIZE {
        return Err(FetchError::Transport(
            "response body exceeds 8 MB limit".to_string(),
        ));
    }

    Ok(HttpResponse {
        url: String::new(),
        status_code,
        headers,
        body,
    })
}

/// Parse the status code out of `HTTP/1.x NNN Reason`.
fn parse_status_line(line: &str) -> Result<u16> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or("");
    if !version.starts_with("HTTP/") {
        return Err(FetchError::Transport(format!("bad status line: {line}")));
    }
    parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| FetchError::Transport(format!("bad status code in: {line}")))
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    let name_lower = name.to_lowercase();
    headers
        .iter()
        .find(|(k, _)| k == &name_lower)
        .map(|(_, v)| v.as_str())
}

/// Decode a chunked transfer-encoded body.
fn decode_chunked(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut pos = 0;

    while let Some(i) = find_subsequence(&data[pos..], b"\r\n") {
        let line_end = pos + i;

        let size_str = std::str::from_utf8(&data[pos..line_end])
            .map_err(|_| FetchError::Transport("bad chunk size".to_string()))?;
        // Strip optional chunk extensions (after `;`).
        let size_str = size_str.split(';').next().unwrap_or("").trim();

        let chunk_size = usize::from_str_radix(size_str, 16)
            .map_err(|_| FetchError::Transport("bad chunk size".to_string()))?;
        if chunk_size == 0 {
            break;
        }

        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + chunk_size;
        if chunk_end > data.len() {
            return Err(FetchError::Transport("truncated chunked body".to_string()));
        }
        if result.len() + chunk_size > MAX_BODY_SIZE {
            return Err(FetchError::Transport(
                "chunked body exceeds 8 MB limit".to_string(),
            ));
        }

        result.extend_from_slice(&data[chunk_start..chunk_end]);
        pos = (chunk_end + 2).min(data.len());
    }

    Ok(result)
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 307 | 308)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
