//! Where a previously issued token comes from.

use std::path::PathBuf;

use thiserror::Error;

use crate::{Session, SessionToken};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session token configured (pass --token or --token-file)")]
    Missing,

    #[error("session token is empty")]
    Empty,

    #[error("failed to read token file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Token sources in precedence order: an inline token wins over a file.
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
    pub inline: Option<String>,
    pub file: Option<PathBuf>,
}

impl TokenSource {
    pub fn inline(token: impl Into<String>) -> Self {
        Self {
            inline: Some(token.into()),
            file: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            inline: None,
            file: Some(path.into()),
        }
    }

    /// Resolve the configured source into a session.
    pub fn load(&self) -> Result<Session, SessionError> {
        let token = if let Some(raw) = &self.inline {
            SessionToken::new(raw.as_str())
        } else if let Some(path) = &self.file {
            let raw = std::fs::read_to_string(path).map_err(|source| SessionError::Read {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "loaded session token from file");
            SessionToken::new(raw)
        } else {
            return Err(SessionError::Missing);
        };

        if token.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Session::new(token))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn inline_token_takes_precedence_over_file() {
        let source = TokenSource {
            inline: Some("inline-token".to_string()),
            file: Some(PathBuf::from("/definitely/not/here")),
        };
        let session = source.load().unwrap();
        assert_eq!(session.token().expose(), "inline-token");
    }

    #[test]
    fn file_token_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-token  ").unwrap();

        let session = TokenSource::file(file.path()).load().unwrap();
        assert_eq!(session.token().expose(), "file-token");
    }

    #[test]
    fn missing_and_empty_sources_are_errors() {
        assert!(matches!(TokenSource::default().load(), Err(SessionError::Missing)));
        assert!(matches!(TokenSource::inline("   ").load(), Err(SessionError::Empty)));
        assert!(matches!(
            TokenSource::file("/definitely/not/here").load(),
            Err(SessionError::Read { .. })
        ));
    }
}
