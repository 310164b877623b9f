//! Errors raised by test code.
//!
//! A [`Raised`] is what escapes a test method (or an `expect_throws` block): either an error value propagated with
//! `?`, or a panic caught by the runner. Its [`ErrorKind`] is compared by exact type identity.

use std::any::{TypeId, type_name};
use std::fmt;
use std::panic::Location;

/// Marker kind for panics caught while running test code.
///
/// Use it as the expected kind to assert that a block panics: `t.expect_throws::<Panic, _>(|| ...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panic;

/// Classifier for a raised error: the concrete type it was raised as, plus a display name.
#[derive(Debug, Clone, Copy)]
pub struct ErrorKind {
    id: TypeId,
    name: &'static str,
}

impl ErrorKind {
    pub fn of<E: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<E>();
        if id == TypeId::of::<Panic>() {
            return Self::panic();
        }
        Self { id, name: type_name::<E>() }
    }

    /// The kind of every caught panic, named `panic`.
    pub fn panic() -> Self {
        Self {
            id: TypeId::of::<Panic>(),
            name: "panic",
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<E: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<E>()
    }
}

/// Exact identity; the display name plays no part.
impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ErrorKind {}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Where a raised error came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    file: String,
    line: u32,
}

impl Origin {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self { file: file.into(), line }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<&Location<'_>> for Origin {
    fn from(location: &Location<'_>) -> Self {
        Origin::new(location.file(), location.line())
    }
}

/// An error that escaped test code.
///
/// Any `std::error::Error` converts into a `Raised` through `?`, which also records the `?` site. `Raised` itself
/// does not implement `Error`, so that conversion can be blanket.
pub struct Raised {
    kind: ErrorKind,
    message: Option<String>,
    origin: Option<Origin>,
}

impl Raised {
    /// Wrap an error value, recording the caller as its origin.
    #[track_caller]
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: ErrorKind::of::<E>(),
            message: non_empty(error.to_string()),
            origin: Some(Location::caller().into()),
        }
    }

    /// Raise a kind that is not an error type (a marker struct, say) with a message.
    #[track_caller]
    pub fn custom<K: 'static>(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::of::<K>(),
            message: non_empty(message.into()),
            origin: Some(Location::caller().into()),
        }
    }

    pub(crate) fn from_panic(message: Option<String>, origin: Option<Origin>) -> Self {
        Self {
            kind: ErrorKind::panic(),
            message: message.and_then(non_empty),
            origin,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn is_panic(&self) -> bool {
        self.kind.is::<Panic>()
    }
}

impl<E> From<E> for Raised
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: E) -> Self {
        Raised::new(error)
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raised")
            .field("kind", &self.kind.name)
            .field("message", &self.message)
            .field("origin", &self.origin)
            .finish()
    }
}

/// `kind[: message]`
impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

fn non_empty(message: String) -> Option<String> {
    if message.is_empty() { None } else { Some(message) }
}
