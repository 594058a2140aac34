use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod graphql;
pub mod pokeapi;
pub mod rest;

mod tests;

pub use graphql::{GraphqlError, GraphqlRequest, GraphqlResponse};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// Decode a JSON response body into a wire type
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    serde_json::from_str(body).map_err(|e| ParseError::InvalidFormat(e.to_string()))
}
