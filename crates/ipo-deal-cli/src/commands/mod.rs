pub mod dashboard;
pub mod deal;
