pub mod implementation;
pub mod message;
pub mod presence;
