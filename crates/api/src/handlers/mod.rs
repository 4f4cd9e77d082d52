pub mod assessment;
pub mod property;
