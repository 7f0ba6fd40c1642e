#[allow(clippy::module_inception)]
pub mod error;
pub mod dispatch;
pub mod store;

pub use dispatch::{DispatchError, RouteError, StatusError, ValidationError};
pub use error::CliError;
pub use store::StoreError;
