/*
[INPUT]:  HTTP client configuration and Lens GraphQL endpoint
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - GraphQL API communication
[UPDATE]: When adding new operations or changing client behavior
*/

pub mod auth;
pub mod client;
pub mod error;
pub mod graphql;
pub mod operations;

pub use error::{ConfigError, ErrorKind, LensError, Result, ValidationError};

pub use client::{ClientConfig, DEFAULT_ORIGIN, LensClient};
