pub mod listener;
pub mod socket;
