//! mediclerk-api
//!
//! REST clients for the clerking backend: record CRUD and account
//! authentication. Requests are authenticated with a bearer token read from
//! an injected [`session::SessionContext`].

pub mod auth;
pub mod client;
pub mod error;
pub mod records;
pub mod session;

mod response;
