//! # Errors
//!
//! Every failure `req` can hit, from a bad flag to a dropped connection.
//! All of them are terminal: the binary prints the message, followed by
//! each underlying cause, and exits 1.

use thiserror::Error;

/// Errors raised while parsing arguments, building or sending a request.
#[derive(Debug, Error)]
pub enum ReqError {
    /// A token starting with `-` that is not a known flag
    #[error("unknown flag {0:?}")]
    UnknownFlag(String),

    /// A value-taking flag was the last token
    #[error("no {0} value")]
    MissingValue(String),

    /// `--format` or `REQ_FORMAT` outside `json`/`form`
    #[error("unknown format {0:?}")]
    UnknownFormat(String),

    /// A body token after `--` without `=`
    #[error("key-value pair {0:?} is invalid")]
    InvalidPair(String),

    /// A `--header` value without `:` or with an illegal name/value
    #[error("header {0:?} is invalid")]
    InvalidHeader(String),

    /// A body value that should be JSON but does not parse
    #[error("invalid value for {key:?}")]
    InvalidJson {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// No method token was given before building
    #[error("no method")]
    NoMethod,

    /// The method token is not a valid HTTP token
    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    /// Scheme, host and path do not form a valid URL
    #[error("invalid url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// An attachment could not be opened or read
    #[error("open {path}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Connection, TLS or protocol failure reported by the client
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Writing the dump or the response to the console failed
    #[error(transparent)]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_should_render_one_line_messages() {
        assert_eq!(
            ReqError::MissingValue("--host".to_string()).to_string(),
            "no --host value"
        );
        assert_eq!(
            ReqError::UnknownFlag("-x".to_string()).to_string(),
            "unknown flag \"-x\""
        );
        assert_eq!(
            ReqError::InvalidPair("title".to_string()).to_string(),
            "key-value pair \"title\" is invalid"
        );
        assert_eq!(
            ReqError::UnknownFormat("xml".to_string()).to_string(),
            "unknown format \"xml\""
        );
    }

    #[test]
    fn attachment_error_should_name_the_path() {
        let err = ReqError::Attachment {
            path: "missing.zip".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "open missing.zip");
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            "open missing.zip: not found"
        );
    }

    #[test]
    fn invalid_json_should_chain_the_parser_error() {
        let source = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let detail = source.to_string();
        let err = ReqError::InvalidJson {
            key: "tags".to_string(),
            source,
        };
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            format!("invalid value for \"tags\": {detail}")
        );
    }

    #[test]
    fn output_error_should_not_repeat_itself() {
        let err = ReqError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(format!("{:#}", anyhow::Error::from(err)), "pipe closed");
    }
}
