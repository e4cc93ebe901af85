use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The two filesystem schemes a transfer endpoint may use.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Scheme {
    /// Local filesystem, `file:<absolute-path>`.
    File,
    /// HDFS, `hdfs://<authority>/<absolute-path>`.
    Hdfs,
}

impl Scheme {
    /// Returns the scheme prefix as written in URIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Hdfs => "hdfs",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a transfer endpoint URI is malformed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum UriError {
    /// No `scheme:` prefix was present.
    #[error("'{input}' has no scheme; expected file: or hdfs://")]
    MissingScheme {
        /// The offending input.
        input: String,
    },
    /// A scheme other than `file` or `hdfs` was given.
    #[error("unsupported scheme '{scheme}' in '{input}'; only file: and hdfs:// are recognized")]
    UnsupportedScheme {
        /// The offending scheme.
        scheme: String,
        /// The offending input.
        input: String,
    },
    /// An `hdfs://` URI did not carry an authority.
    #[error("'{input}' is missing the hdfs authority (expected hdfs://host[:port]/path)")]
    MissingAuthority {
        /// The offending input.
        input: String,
    },
    /// The path component was empty or relative.
    #[error("'{input}' must carry an absolute path")]
    RelativePath {
        /// The offending input.
        input: String,
    },
}

/// A validated transfer endpoint.
///
/// Only two forms are accepted: `file:<absolute-path>` (an optional `//`
/// after the colon is tolerated, as in `file:///tmp`) and
/// `hdfs://<authority>/<absolute-path>`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Uri {
    scheme: Scheme,
    authority: Option<String>,
    path: PathBuf,
}

impl Uri {
    /// Parses and validates an endpoint string.
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let (scheme_text, rest) = input.split_once(':').ok_or_else(|| UriError::MissingScheme {
            input: input.to_string(),
        })?;

        match scheme_text {
            "file" => {
                let path_text = rest.strip_prefix("//").unwrap_or(rest);
                if !path_text.starts_with('/') {
                    return Err(UriError::RelativePath {
                        input: input.to_string(),
                    });
                }
                Ok(Self {
                    scheme: Scheme::File,
                    authority: None,
                    path: PathBuf::from(path_text),
                })
            }
            "hdfs" => {
                let rest = rest
                    .strip_prefix("//")
                    .ok_or_else(|| UriError::MissingAuthority {
                        input: input.to_string(),
                    })?;
                let slash = rest.find('/').ok_or_else(|| UriError::RelativePath {
                    input: input.to_string(),
                })?;
                let (authority, path_text) = rest.split_at(slash);
                if authority.is_empty() {
                    return Err(UriError::MissingAuthority {
                        input: input.to_string(),
                    });
                }
                Ok(Self {
                    scheme: Scheme::Hdfs,
                    authority: Some(authority.to_string()),
                    path: PathBuf::from(path_text),
                })
            }
            other => Err(UriError::UnsupportedScheme {
                scheme: other.to_string(),
                input: input.to_string(),
            }),
        }
    }

    /// Returns the scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the authority of an `hdfs://` URI.
    #[must_use]
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Returns the absolute path component.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the path component, keeping scheme and authority.
    #[must_use]
    pub fn with_path(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            scheme: self.scheme,
            authority: self.authority.clone(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.authority {
            Some(authority) => write!(f, "hdfs://{}{}", authority, self.path.display()),
            None => write!(f, "file:{}", self.path.display()),
        }
    }
}
