use super::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to process {document} JSON: {source}")]
    Json {
        document: Document,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {document} entry {index}: {details}")]
    Record {
        document: Document,
        index: usize,
        details: String,
    },

    #[error(transparent)]
    Engine(#[from] crate::engine::Error),
}

impl Error {
    /// Wraps a serde_json failure; failures of the underlying reader or
    /// writer are reported as [`Error::Io`].
    pub fn json(document: Document, source: serde_json::Error) -> Self {
        if source.is_io() {
            Self::Io {
                source: source.into(),
            }
        } else {
            Self::Json { document, source }
        }
    }

    pub fn record(document: Document, index: usize, details: impl Into<String>) -> Self {
        Self::Record {
            document,
            index,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_failure_is_an_io_error() {
        let source = serde_json::to_writer(ClosedPipe, &[1, 2, 3]).unwrap_err();
        match Error::json(Document::Matrix, source) {
            Error::Io { source } => assert_eq!(source.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn syntax_failure_names_the_document() {
        let source = serde_json::from_str::<Vec<u8>>("[1,").unwrap_err();
        let err = Error::json(Document::NeighborMap, source);
        assert!(matches!(err, Error::Json { document: Document::NeighborMap, .. }));
        assert!(err.to_string().starts_with("failed to process neighbor map JSON"));
    }

    #[test]
    fn record_message_carries_index() {
        let err = Error::record(Document::Compounds, 3, "missing name");
        assert_eq!(err.to_string(), "invalid compound entry 3: missing name");
    }
}
