use rbb_competition::CompetitionError;

/// Failures reading or writing saved state.
#[derive(Debug)]
pub enum SaveError {
    /// No competition header exists, or it cannot be read.
    NoSavedState,
    /// A document is present but malformed or incomplete.
    Corrupt(String),
    /// A document was written by a newer version.
    Version { found: u64, supported: u64 },
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Documents parsed but do not reassemble into a competition.
    Restore(CompetitionError),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSavedState => write!(f, "no saved state"),
            Self::Corrupt(reason) => write!(f, "corrupt document: {}", reason),
            Self::Version { found, supported } => write!(
                f,
                "document version {} is newer than supported version {}",
                found, supported
            ),
            Self::Io(e) => write!(f, "io: {}", e),
            Self::Json(e) => write!(f, "json: {}", e),
            Self::Restore(e) => write!(f, "restore: {}", e),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Restore(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
impl From<CompetitionError> for SaveError {
    fn from(e: CompetitionError) -> Self {
        Self::Restore(e)
    }
}
