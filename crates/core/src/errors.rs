//! Conversions from token lifecycle errors into domain errors.

use songlink_common::auth::{OAuthClientError, TokenManagerError};
use songlink_common::storage::StorageError;
use songlink_domain::SongLinkError;

/// Error newtype that keeps conversions on the core side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct CoreError(pub SongLinkError);

impl From<CoreError> for SongLinkError {
    fn from(value: CoreError) -> Self {
        value.0
    }
}

impl From<SongLinkError> for CoreError {
    fn from(value: SongLinkError) -> Self {
        CoreError(value)
    }
}

/// Explicit conversion into the domain error, usable in `map_err`.
pub trait IntoSongLinkError {
    fn into_songlink(self) -> SongLinkError;
}

/* -------------------------------------------------------------------------- */
/* StorageError → SongLinkError */
/* -------------------------------------------------------------------------- */

impl IntoSongLinkError for StorageError {
    fn into_songlink(self) -> SongLinkError {
        SongLinkError::Storage(self.to_string())
    }
}

impl From<StorageError> for CoreError {
    fn from(value: StorageError) -> Self {
        CoreError(value.into_songlink())
    }
}

/* -------------------------------------------------------------------------- */
/* OAuthClientError → SongLinkError */
/* -------------------------------------------------------------------------- */

impl IntoSongLinkError for OAuthClientError {
    fn into_songlink(self) -> SongLinkError {
        use OAuthClientError as OE;

        match self {
            OE::RequestFailed(err) if err.is_timeout() => {
                SongLinkError::Network("token endpoint timed out".into())
            }
            OE::RequestFailed(err) => SongLinkError::Network(err.to_string()),
            OE::HttpStatus { status, body } if status >= 500 => {
                SongLinkError::Network(format!("token endpoint returned {status}: {body}"))
            }
            OE::ParseError(msg) => {
                SongLinkError::Network(format!("unexpected token endpoint response: {msg}"))
            }
            OE::ConfigError(msg) => SongLinkError::InvalidInput(msg),
            other => SongLinkError::Auth(other.to_string()),
        }
    }
}

impl From<OAuthClientError> for CoreError {
    fn from(value: OAuthClientError) -> Self {
        CoreError(value.into_songlink())
    }
}

/* -------------------------------------------------------------------------- */
/* TokenManagerError → SongLinkError */
/* -------------------------------------------------------------------------- */

impl IntoSongLinkError for TokenManagerError {
    fn into_songlink(self) -> SongLinkError {
        match self {
            TokenManagerError::Storage(err) => err.into_songlink(),
            TokenManagerError::Exchange(err) => err.into_songlink(),
            TokenManagerError::MissingRefreshToken => {
                SongLinkError::Auth("token response did not include a refresh token".into())
            }
        }
    }
}

impl From<TokenManagerError> for CoreError {
    fn from(value: TokenManagerError) -> Self {
        CoreError(value.into_songlink())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
