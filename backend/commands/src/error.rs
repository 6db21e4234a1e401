/// Argument and type registration errors.
///
/// These are raised while a command's arguments are being built, never while
/// resolving user input. A command that fails here is misdeclared.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentConfigError {
    #[error("argument key must not be empty")]
    EmptyKey,

    #[error("argument \"{key}\" has no type and no custom validate + parse pair")]
    MissingType { key: String },

    #[error("argument \"{key}\" has an unregistered type \"{type_id}\"")]
    UnknownType { key: String, type_id: String },

    #[error("type id \"{0}\" must be non-empty, lowercase, and must not contain '|'")]
    InvalidTypeId(String),

    #[error("a type with id \"{0}\" is already registered")]
    DuplicateType(String),

    #[error("argument key \"{0}\" is declared more than once")]
    DuplicateKey(String),

    #[error("infinite argument \"{key}\" must be the last argument")]
    InfiniteNotLast { key: String },

    #[error("required argument \"{key}\" may not come after an optional argument")]
    RequiredAfterOptional { key: String },
}
