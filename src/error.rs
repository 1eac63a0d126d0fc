use thiserror::Error;

/// Problems with question content supplied from outside the binary.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("share payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("share payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("share payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question {index} has {found} options, expected 4")]
    OptionCount { index: usize, found: usize },
    #[error("question {index} marks option {correct} as correct, but only 0..4 exist")]
    CorrectIndex { index: usize, correct: i64 },
    #[error("question {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },
    #[error("need at least {needed} questions, got {found}")]
    TooFewQuestions { needed: usize, found: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unlock code cannot be empty")]
    EmptyCode,
    #[error("unlock code must be digits only, got {0:?}")]
    NonDigitCode(String),
    #[error("location key cannot be empty")]
    EmptyLocation,
    #[error("duplicate location key: {0}")]
    DuplicateLocation(String),
    #[error("location key {0:?} is reserved for a gate")]
    ReservedLocation(String),
    #[error("{clues} clues need at least as many locations, got {locations}")]
    TooFewLocations { clues: usize, locations: usize },
}

/// Invalid call sequences from the presentation layer. Player mistakes are
/// never reported through this type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no clue with id {0}")]
    UnknownClue(usize),
    #[error("choice {choice} is out of range for a 4-option question")]
    ChoiceOutOfRange { choice: usize },
    #[error("unknown location key: {0}")]
    UnknownLocation(String),
    #[error("clue {slot} is not at location {location}")]
    SlotNotAtLocation { slot: usize, location: String },
    #[error("{0} is only available in trail mode")]
    NotTrailMode(&'static str),
}

/// A session could not be created. Init is all-or-nothing.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
}
