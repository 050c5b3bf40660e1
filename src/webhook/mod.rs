pub mod classify;
pub mod matchers;
pub mod mock;
pub mod models;
pub mod transport;
