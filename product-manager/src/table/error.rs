/// Error from table configuration and field lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A requested column key has no template
    UnknownField(String),
    /// A timezone name chrono-tz does not know
    InvalidTimezone(String),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::UnknownField(key) => write!(f, "unknown field key: '{}'", key),
            TableError::InvalidTimezone(name) => write!(f, "invalid timezone: '{}'", name),
        }
    }
}

impl std::error::Error for TableError {}
