//! Request and response shapes exchanged with the hub transport.

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::HubResponse;
