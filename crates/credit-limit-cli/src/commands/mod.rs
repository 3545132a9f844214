pub mod limit;
pub mod scoring;
pub mod statement;
