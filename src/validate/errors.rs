//! Validation failure types.
//!
//! Per-field failures accumulate across the whole record before being
//! reported as one aggregate; hook violations abort construction and are
//! reported alone. Everything is returned to the caller as data.

use std::fmt;

/// What went wrong with one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required field absent from the raw input
    MissingField,
    /// Value outside the declared type's coercion allow-list
    TypeMismatch,
    /// Value of the right primitive type but malformed (email, URL)
    Format,
    /// A declared constraint failed
    Constraint,
    /// An after-hook rejected the constructed record
    CrossField,
    /// A before-hook rejected the raw input
    DisallowedInput,
}

impl ErrorKind {
    /// Returns the kind name for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingField => "missing_field",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::Format => "format",
            ErrorKind::Constraint => "constraint",
            ErrorKind::CrossField => "cross_field",
            ErrorKind::DisallowedInput => "disallowed_input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step in a field path: a field name or a list index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named field
    Field(String),
    /// List element index
    Index(usize),
}

/// Location of a failure inside a (possibly nested) record.
///
/// Rendered as `owner.employees[1].email`; the empty path renders as
/// `$root`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The whole-record path
    pub fn root() -> Self {
        Self::default()
    }

    /// A path starting at one field
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Returns a copy with a field segment appended
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a copy with an index segment appended
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Splices an outer path in front of this one.
    ///
    /// Used when nested validation errors surface in the outer record.
    pub fn prefix_with(&mut self, outer: &FieldPath) {
        let mut segments = outer.segments.clone();
        segments.append(&mut self.segments);
        self.segments = segments;
    }

    /// The path segments, outermost first
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$root");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// One recorded failure
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Where the failure occurred
    pub path: FieldPath,
    /// Failure category
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Create a missing required field error
    pub fn missing_field(path: FieldPath) -> Self {
        Self {
            path,
            kind: ErrorKind::MissingField,
            message: "required field is missing".into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(path: FieldPath, expected: &str, actual: &str) -> Self {
        Self {
            path,
            kind: ErrorKind::TypeMismatch,
            message: format!("expected {}, got {}", expected, actual),
        }
    }

    /// Create a format error
    pub fn format(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::Format,
            message: message.into(),
        }
    }

    /// Create a constraint error
    pub fn constraint(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::Constraint,
            message: message.into(),
        }
    }

    /// Create a cross-field error from an after-hook
    pub fn cross_field(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::CrossField,
            message: message.into(),
        }
    }

    /// Create a disallowed input error from a before-hook
    pub fn disallowed_input(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::DisallowedInput,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.path, self.kind, self.message)
    }
}

/// Aggregate of every failure found while validating one record.
///
/// No instance is ever constructed alongside this; validation is
/// all-or-nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    record: String,
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Create an aggregate from recorded field errors
    pub fn new(record: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            record: record.into(),
            errors,
        }
    }

    /// Create an aggregate holding a single error
    pub fn single(record: impl Into<String>, error: FieldError) -> Self {
        Self::new(record, vec![error])
    }

    /// The record type name the input was validated against
    pub fn record(&self) -> &str {
        &self.record
    }

    /// The recorded failures, in field declaration order
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Number of recorded failures
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns all failures of the given kind
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Consumes the aggregate, yielding the failures
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} validation error(s) for record '{}'",
            self.errors.len(),
            self.record
        )?;
        for error in &self.errors {
            writeln!(f, "  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
