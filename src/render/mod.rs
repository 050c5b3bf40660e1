pub mod markdown;
pub mod report;
pub mod templates;
