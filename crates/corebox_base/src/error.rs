use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # Why separate ErrorKind and CoreboxError?

ErrorKind is the structural part callers match on: a missing path, a failed I/O
operation, an argument that cannot be used.

CoreboxError wraps it with everything gathered while the error travels towards
the caller: context strings and the span trace captured when the error was
created.
*/

/// Error variants that can occur in corebox operations.
#[derive(Debug)]
pub enum ErrorKind {
    /// The target path does not exist where presence is required
    NotFound { path: PathBuf },

    /// File system operation failed
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Arguments that cannot be combined or interpreted
    InvalidArgument { message: String },

    /// Catch-all for other errors with a message
    Message { message: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound { path } => write!(f, "Not found: {}", path.display()),
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::InvalidArgument { message } => write!(f, "Invalid argument: {}", message),
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }
}

/// Error type wrapping an [`ErrorKind`] with context and a span trace.
pub struct CoreboxError {
    kind: ErrorKind,
    context: Vec<String>,
    span_trace: SpanTrace,
}

impl CoreboxError {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(ErrorKind::NotFound { path: path.into() })
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument {
            message: message.into(),
        })
    }

    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::new(ErrorKind::FileError {
            path: path.into(),
            source,
        })
    }

    /// Classifies an I/O error raised while accessing an existing target.
    ///
    /// A missing target becomes [`ErrorKind::NotFound`], anything else a [`ErrorKind::FileError`].
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(path)
        } else {
            Self::file_error(path, source)
        }
    }

    /// Attaches context to an error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument { .. })
    }
}

impl From<ErrorKind> for CoreboxError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for CoreboxError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for CoreboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for context in &self.context {
            write!(f, "{}: ", context)?;
        }
        write!(f, "{}", self.kind)
    }
}

/* 📖 # How is an error printed with {:?}?

Debug output is a tree meant for humans reading logs:

```text
Not found: data/notes.txt
├─ inner context
└─ outer context
Trace:    0: ...
```

The trace section only appears when a span trace was actually captured.
*/

impl fmt::Debug for CoreboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        for (index, context) in self.context.iter().enumerate() {
            let branch = if index + 1 == self.context.len() { "└─" } else { "├─" };
            writeln!(f, "{branch} {context}")?;
        }
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            writeln!(f, "Trace: {}", self.span_trace)?;
        }
        Ok(())
    }
}

/// Standard result type for corebox operations.
///
/// The error is boxed to keep the `Ok` path small.
pub type CoreboxResult<T> = std::result::Result<T, Box<CoreboxError>>;

/// Extension trait for attaching context to results during propagation.
pub trait ResultExt<T> {
    /// Attaches context to an error. The context is evaluated eagerly.
    fn context(self, context: impl Into<String>) -> CoreboxResult<T>;

    /// Attaches context using lazy evaluation, only when the result is an error.
    fn with_context<F>(self, f: F) -> CoreboxResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for CoreboxResult<T> {
    fn context(self, context: impl Into<String>) -> CoreboxResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> CoreboxResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}

/// Creates a boxed message error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        ::std::boxed::Box::new($crate::CoreboxError::message(format!($($arg)*)))
    };
}
