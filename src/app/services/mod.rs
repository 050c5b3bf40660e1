pub mod forwarding_service;
pub mod session_service;
