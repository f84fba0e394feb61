//! Location listing pages and the capability that fetches them.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use pokedex_net::http::{HttpOptions, http_get};
use pokedex_net::tls::TlsProvider;
use pokedex_types::config::PokedexConfig;
use pokedex_types::error::FetchError;

/// One named record in a listing (`{name, url}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One page of a paginated listing.
///
/// `next` / `previous` are `None` whether the server sent `null`, omitted
/// the field, or sent an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub count: u64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Decode a response body into a [`Page`].
pub fn decode_page(body: &[u8]) -> Result<Page, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Fetches one page given its URL.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// [`PageFetcher`] over the blocking HTTP client.
pub struct HttpPageFetcher {
    options: HttpOptions,
    tls: Option<Arc<dyn TlsProvider>>,
}

impl HttpPageFetcher {
    /// Plain-HTTP fetcher; add TLS with [`HttpPageFetcher::with_tls`].
    pub fn new(options: HttpOptions) -> Self {
        Self { options, tls: None }
    }

    pub fn from_config(config: &PokedexConfig) -> Self {
        Self::new(HttpOptions {
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn with_tls(mut self, tls: Arc<dyn TlsProvider>) -> Self {
        self.tls = Some(tls);
        self
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let resp = http_get(url, self.tls.as_deref(), &self.options)?;
        if resp.status_code >= 300 {
            return Err(FetchError::Status {
                status: resp.status_code,
                body: String::from_utf8_lossy(&resp.body).into_owned(),
            });
        }
        let page = decode_page(&resp.body)?;
        log::debug!(
            "Fetched {} ({} of {} results)",
            resp.url,
            page.results.len(),
            page.count
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    #[test]
    fn decode_first_page() {
        let body = br#"{
            "count": 1089,
            "next": "https://pokeapi.co/api/v2/location/?offset=20&limit=20",
            "previous": null,
            "results": [
                {"name": "canalave-city", "url": "https://pokeapi.co/api/v2/location/1/"},
                {"name": "eterna-city", "url": "https://pokeapi.co/api/v2/location/2/"}
            ]
        }"#;
        let page = decode_page(body).unwrap();
        assert_eq!(page.count, 1089);
        assert_eq!(
            page.next.as_deref(),
            Some("https://pokeapi.co/api/v2/location/?offset=20&limit=20")
        );
        assert_eq!(page.previous, None);
        let names: Vec<&str> = page.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["canalave-city", "eterna-city"]);
        assert_eq!(page.results[1].url, "https://pokeapi.co/api/v2/location/2/");
    }

    #[test]
    fn empty_string_links_are_absent() {
        let page =
            decode_page(br#"{"results":[{"name":"pallet-town"}],"next":"page2","previous":""}"#)
                .unwrap();
        assert_eq!(page.next.as_deref(), Some("page2"));
        assert_eq!(page.previous, None);
        assert_eq!(page.count, 0);
        assert_eq!(page.results[0].url, "");
    }

    #[test]
    fn missing_links_are_absent() {
        let page = decode_page(br#"{"count":0,"results":[]}"#).unwrap();
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
    }

    #[test]
    fn missing_results_is_decode_error() {
        let err = decode_page(br#"{"count":3,"next":null}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn non_json_is_decode_error() {
        let err = decode_page(b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    fn serve_once(response: String) -> (u16, std::thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            stream.write_all(response.as_bytes()).unwrap();
        });
        (port, handle)
    }

    #[test]
    fn http_fetcher_decodes_page() {
        let body = r#"{"count":2,"next":null,"previous":"","results":[{"name":"a","url":"u"}]}"#;
        let (port, handle) = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ));
        let fetcher = HttpPageFetcher::new(HttpOptions::default());
        let page = fetcher
            .fetch(&format!("http://127.0.0.1:{port}/api/v2/location/"))
            .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.previous, None);
        handle.join().unwrap();
    }

    #[test]
    fn http_fetcher_maps_error_status() {
        let (port, handle) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nNot Found".to_string(),
        );
        let fetcher = HttpPageFetcher::from_config(&PokedexConfig::default());
        let err = fetcher
            .fetch(&format!("http://127.0.0.1:{port}/missing"))
            .unwrap_err();
        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Not Found");
            },
            other => panic!("expected status error, got {other:?}"),
        }
        handle.join().unwrap();
    }

    #[test]
    fn http_fetcher_maps_bad_body() {
        let (port, handle) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\nnop".to_string());
        let fetcher = HttpPageFetcher::new(HttpOptions::default());
        let err = fetcher.fetch(&format!("http://127.0.0.1:{port}/")).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        handle.join().unwrap();
    }
}
