pub mod argument;
pub mod awaiting;
pub mod collector;
pub mod error;
mod infinite;
pub mod prompting;
pub mod registry;
pub mod result;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use argument::{
    ArgDefault, Argument, ArgumentDef, CustomInput, TypeSpec, ValueOverrides, DEFAULT_WAIT_SECS,
};
pub use awaiting::{AwaitingGuard, AwaitingSet, Conversation};
pub use collector::ArgumentCollector;
pub use error::ArgumentConfigError;
pub use prompting::{CANCEL_KEYWORD, FINISH_KEYWORD};
pub use registry::{TypeFactory, TypeRegistration, TypeRegistry};
pub use result::{ArgumentResult, CancelReason, CollectorResult};
pub use types::{
    parse_duration, BooleanType, DurationType, EntityDirectory, EntityType, FloatType,
    IntegerType, StringType, UnionType, ValueContext, ValueType,
};
pub use value::{ArgValue, EntityKind, EntityRef, RawInput, Validation};
