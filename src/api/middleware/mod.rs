//! Request processing middleware.

pub mod access_log;
