//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use songlink_domain::SongLinkError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SongLinkError);

impl From<InfraError> for SongLinkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SongLinkError> for InfraError {
    fn from(value: SongLinkError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSongLinkError {
    fn into_songlink(self) -> SongLinkError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → SongLinkError */
/* -------------------------------------------------------------------------- */

impl IntoSongLinkError for KeyringError {
    fn into_songlink(self) -> SongLinkError {
        use KeyringError::*;

        let description = self.to_string();
        match self {
            NoEntry => SongLinkError::Storage("keychain entry not found".into()),
            BadEncoding(_) => {
                SongLinkError::Storage("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => SongLinkError::Config(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                SongLinkError::Config(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            PlatformFailure(err) => {
                SongLinkError::Storage(format!("keychain platform error: {err}"))
            }
            NoStorageAccess(err) => {
                SongLinkError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => SongLinkError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_songlink())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SongLinkError */
/* -------------------------------------------------------------------------- */

impl IntoSongLinkError for HttpError {
    fn into_songlink(self) -> SongLinkError {
        if self.is_timeout() {
            return SongLinkError::Network("HTTP request timed out".into());
        }
        if self.is_connect() {
            return SongLinkError::Network("HTTP connection failure".into());
        }
        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
            return match code {
                401 | 403 => SongLinkError::Auth(message),
                429 => SongLinkError::Network(message),
                400..=499 => SongLinkError::InvalidInput(message),
                _ => SongLinkError::Network(message),
            };
        }
        if self.is_decode() {
            return SongLinkError::Network(format!("unexpected response body: {self}"));
        }
        SongLinkError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_songlink())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
