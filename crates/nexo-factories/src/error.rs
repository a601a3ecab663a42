//! Factory and seeding errors

use thiserror::Error;

pub type FactoryResult<T> = Result<T, FactoryError>;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("factory for '{table}' has no state named '{state}'")]
    UnknownState { table: String, state: String },

    #[error("no factory registered as '{0}'")]
    UnknownFactory(String),

    #[error("cannot create {table}: column '{column}' needs a row in '{parent}', which is empty")]
    MissingParent {
        table: String,
        column: String,
        parent: String,
    },

    #[error("could not generate a unique {table}.{column} after {attempts} attempts")]
    UniqueExhausted {
        table: String,
        column: String,
        attempts: usize,
    },

    #[error("factory output does not fit the model: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("seeding failed: {0}")]
    Seeding(String),
}

impl FactoryError {
    pub fn seeding(message: impl Into<String>) -> Self {
        FactoryError::Seeding(message.into())
    }
}
