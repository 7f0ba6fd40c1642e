pub mod http;

pub use http::{ReqwestHttpBackend, GOVERNOR_KEY_HEADER};
