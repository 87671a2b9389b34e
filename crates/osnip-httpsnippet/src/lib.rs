pub mod clients;
pub mod generator;
pub mod har;
pub mod sample;

pub use generator::HttpSnippet;
