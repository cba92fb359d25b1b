use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    /// Empty sequence, or characters outside the nucleic-acid alphabet.
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("unknown restriction enzyme '{0}'")]
    UnknownEnzyme(String),

    /// Bad cut geometry in a cut location pair, a cut range or an enzyme
    /// definition. This is a catalog/programming error, not user input.
    #[error("malformed cut specification: {0}")]
    MalformedCutSpecification(String),

    #[error("invalid recognition site pattern: {0}")]
    InvalidPattern(String),

    /// A group of mutually blocking enzyme actions too large to order exhaustively.
    #[error("{count} interacting enzyme actions exceed the permutation limit of {limit}")]
    TooManyEnzymeActions { count: usize, limit: usize },

    #[error("{count} distinct digest outcomes exceed the limit of {limit}")]
    TooManyCutOutcomes { count: usize, limit: usize },

    #[error("bad enzyme catalog: {0}")]
    Catalog(String),
}

impl From<serde_json::Error> for DigestError {
    fn from(err: serde_json::Error) -> Self {
        DigestError::Catalog(err.to_string())
    }
}

impl From<regex::Error> for DigestError {
    fn from(err: regex::Error) -> Self {
        DigestError::InvalidPattern(err.to_string())
    }
}
