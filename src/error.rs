use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("no equations given")]
    EmptySystem,

    #[error("malformed equation #{}: {reason}", .index + 1)]
    MalformedEquation { index: usize, reason: Malformed },
}

/// What makes an equation unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum Malformed {
    NoTerms,
    NonFiniteRhs(f64),
    NonFiniteCoef(String),
}

impl std::fmt::Display for Malformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Malformed::NoTerms => f.write_str("no terms"),
            Malformed::NonFiniteRhs(rhs) => write!(f, "right-hand side {rhs} is not finite"),
            Malformed::NonFiniteCoef(var) => {
                write!(f, "coefficient of `{var}` is not finite")
            }
        }
    }
}
