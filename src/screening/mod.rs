pub mod earnings;
pub mod engine;
pub mod filter;
pub mod report;
