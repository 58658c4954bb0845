//! Request handlers: decode parameters, call the service, encode results.

pub mod users;
