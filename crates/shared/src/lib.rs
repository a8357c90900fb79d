pub mod domain;
pub mod error;
pub mod input;
pub mod protocol;
pub mod speed;
