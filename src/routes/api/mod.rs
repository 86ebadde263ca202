pub mod roster;
pub mod ws;
