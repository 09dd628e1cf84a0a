//! Backend abstraction: trait seams plus the REST implementation.

pub mod http;
#[cfg(test)]
pub(crate) mod memory;
pub mod traits;

pub use http::{HttpError, RestClient};
pub use traits::{CatalogSource, UserDirectory, UserQuery};
