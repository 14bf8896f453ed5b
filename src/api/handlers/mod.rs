pub mod chapter;
pub mod import;
pub mod manga;
pub mod reader;
