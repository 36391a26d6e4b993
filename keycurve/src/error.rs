use thiserror::Error;

/// Errors produced by the strict persisted-layout loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("layout json parse error: {0}")]
    Parse(String),
    #[error("unsupported layout version {0}")]
    UnsupportedVersion(u32),
    #[error("layout has no layers")]
    Empty,
    #[error("{what} exceeds cap of {cap}")]
    CapsExceeded { what: &'static str, cap: usize },
    #[error("{0} out of bounds")]
    OutOfBounds(String),
    #[error("unknown units '{0}'")]
    UnknownUnits(String),
    #[error("property '{0}' used by more than one layer")]
    DuplicateProperty(String),
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
}

impl LoadError {
    /// Stable machine-readable code, surfaced to hosts in result objects.
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Parse(_) => "json_parse",
            LoadError::UnsupportedVersion(_) => "unsupported_version",
            LoadError::Empty => "empty",
            LoadError::CapsExceeded { .. } => "caps_exceeded",
            LoadError::OutOfBounds(_) => "out_of_bounds",
            LoadError::UnknownUnits(_) => "unknown_units",
            LoadError::DuplicateProperty(_) => "duplicate_property",
            LoadError::InvalidStructure(_) => "invalid_structure",
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e.to_string())
    }
}
