pub mod capture;
pub mod output;
pub mod prompt;
pub mod status;
