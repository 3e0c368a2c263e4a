pub mod duration;
pub mod interface;
