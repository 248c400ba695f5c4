pub mod features;
pub mod generate;
pub mod prompt;
