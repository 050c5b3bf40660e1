pub mod backend;
pub mod conversation;
pub mod message;
