pub mod remote;

pub use remote::{GovernorClient, RouteResponse, StatusResponse};
