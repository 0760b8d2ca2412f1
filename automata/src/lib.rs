
pub mod parser;
pub mod location;
