use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur while parsing asset
/// containers and the proprietary data tables embedded inside them. Each variant provides
/// specific context about the failure mode to enable appropriate error handling.
///
/// # Error Categories
///
/// ## Structural Errors
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond buffer boundaries
/// - [`Error::NotSupported`] - Unsupported container feature (embedded type trees)
/// - [`Error::Empty`] - Empty input provided
///
/// ## Lookup Errors
/// - [`Error::AssetNotFound`] - A named asset is absent from the directory
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust,no_run
/// use dysonscope::{container::ContainerFile, Error};
/// use std::path::Path;
///
/// match ContainerFile::open(Path::new("resources.assets")) {
///     Ok(container) => {
///         println!("Parsed {} assets", container.records().len());
///     }
///     Err(Error::NotSupported) => {
///         eprintln!("Container carries embedded type trees");
///     }
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(e) => {
///         eprintln!("Other error: {}", e);
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// The structure does not conform to the expected container layout for its
    /// declared format version. The error includes the source location where the
    /// malformation was detected for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    ///
    /// This error occurs when trying to read data beyond the end of a buffer.
    /// It's a safety check to prevent buffer overruns during parsing.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This container feature is not supported.
    ///
    /// Raised when the container declares embedded full type trees, which this
    /// library does not parse. There is no partial result in this case.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// A named asset was not found in the container directory.
    #[error("Asset '{0}' not found in container directory")]
    AssetNotFound(String),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur during file operations
    /// such as reading from disk, permission issues, or filesystem errors.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for
    /// wrapping external failures with additional context.
    #[error("{0}")]
    Error(String),
}
