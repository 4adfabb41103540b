pub mod repositories;
pub mod smtp;
