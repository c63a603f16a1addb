use thiserror::Error;

/// Coarse error classes surfaced to whoever presents failures to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    EncodingCapacityExceeded,
    EmptyInput,
    IoFailure,
}

/// Errors produced while encoding, tiling or archiving labels.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("content of {len} bytes does not fit in a QR symbol at low error correction")]
    EncodingCapacityExceeded { len: usize },

    #[error("no labels to assemble")]
    EmptyInput,

    #[error("record {index} ({label_id:?}) failed: {source}")]
    Record {
        index: usize,
        label_id: String,
        #[source]
        source: Box<LabelError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("tabular input error: {0}")]
    Csv(#[from] csv::Error),
}

impl LabelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LabelError::InvalidInput(_) => ErrorKind::InvalidInput,
            LabelError::EncodingCapacityExceeded { .. } => ErrorKind::EncodingCapacityExceeded,
            LabelError::EmptyInput => ErrorKind::EmptyInput,
            LabelError::Csv(err) if !err.is_io_error() => ErrorKind::InvalidInput,
            LabelError::Record { source, .. } => source.kind(),
            LabelError::Io(_)
            | LabelError::Image(_)
            | LabelError::Archive(_)
            | LabelError::Csv(_) => ErrorKind::IoFailure,
        }
    }

    /// Attach the position and identifier of the record that failed.
    pub fn for_record(self, index: usize, label_id: impl Into<String>) -> Self {
        LabelError::Record {
            index,
            label_id: label_id.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LabelError>;
