//! Built-in validators

pub mod choice;
pub mod compare;
pub mod custom;
pub mod database;
pub mod date;
pub mod email;
pub mod pattern;
pub mod required;
pub mod size;
pub mod types;
pub mod url;

pub use choice::InValidator;
pub use compare::{CompareValidator, FieldComparison};
pub use custom::CustomValidator;
pub use database::{ExistsValidator, UniqueValidator};
pub use date::{DateCompareValidator, DateComparison, DateTarget, DateValidator};
pub use email::EmailValidator;
pub use pattern::PatternValidator;
pub use required::{AcceptedValidator, RequiredIfValidator, RequiredValidator, RequiredWithValidator};
pub use size::{SizeRule, SizeValidator};
pub use types::{TypeValidator, ValueType};
pub use self::url::UrlValidator;
