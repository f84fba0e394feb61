//! Error types for the Pokedex explorer.

/// Failure of a single page fetch.
///
/// The session does not branch on the variant; any of these aborts the
/// cursor update. The split exists so the message tells the user what broke.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// DNS, connect, TLS, or socket I/O failure, or an unusable URL.
    #[error("cannot fetch locations: {0}")]
    Transport(String),

    /// The server answered with a status code >= 300.
    #[error("Response failed with status code: {status} and\nbody: {body}")]
    Status { status: u16, body: String },

    /// The body did not match the page schema.
    #[error("malformed page: {0}")]
    Decode(String),
}

/// Errors produced by the Pokedex explorer.
#[derive(Debug, thiserror::Error)]
pub enum PokedexError {
    #[error(transparent)]
    FetchFailed(#[from] FetchError),

    #[error("previous page not available")]
    NoPreviousPage,

    #[error("invalid command: {0}")]
    CommandNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PokedexError>;
