use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ModelError {
    #[error("Unknown component: {name}")]
    UnknownComponent { name: String },

    #[error("Name '{alias}' is already registered (held by '{existing}')")]
    DuplicateAlias { alias: String, existing: String },

    #[error("Unknown aspect: {name}")]
    UnknownAspect { name: String },

    #[error("Stale or foreign operation handle")]
    UnknownOperation,

    #[error("Operation '{operation}' is already attached to a model")]
    AlreadyAttached { operation: String },

    #[error("Operation '{operation}' has no operate conversion")]
    MissingConversion { operation: String },

    #[error(
        "Conversion of '{operation}' (mode {mode}) references a commodity not in this model"
    )]
    InconsistentModes { operation: String, mode: usize },

    #[error("Operation '{operation}' cannot be balanced at '{space}': space kind does not match its domain")]
    IncompatibleSpace { operation: String, space: String },
}
