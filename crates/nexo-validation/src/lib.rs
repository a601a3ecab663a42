//! # nexo-validation
//!
//! Declarative request validation for the nexo platform. Rules are written as
//! `|`-separated rule strings (`"required|string|max:255"`) or as typed
//! validators, failures are reported per field with Spanish messages, and
//! form requests bundle authorization, rules, cross-field checks and payload
//! enrichment.

pub mod data;
pub mod error;
pub mod lang;
pub mod parser;
pub mod presence;
pub mod request;
pub mod rules;
pub mod traits;
pub mod validator;
pub mod validators;

// Re-exports for easy access
pub use data::Data;
pub use error::{RuleParseError, ValidationError, ValidationErrors, ValidationResult};
pub use presence::PresenceVerifier;
pub use request::{handle, FormRequest, RequestContext, RequestError};
pub use rules::{FieldRules, Rules};
pub use traits::{RuleContext, SizeKind, ValidationRule};
pub use validator::Validator;

// Built-in validators
pub use validators::{
    AcceptedValidator, CompareValidator, CustomValidator, DateCompareValidator, DateValidator, EmailValidator,
    ExistsValidator, InValidator, PatternValidator, RequiredIfValidator, RequiredValidator, RequiredWithValidator,
    SizeValidator, TypeValidator, UniqueValidator, UrlValidator,
};
