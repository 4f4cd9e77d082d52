//! Repository layer: one stateless struct per table.

pub mod assessment_repo;
pub mod property_repo;

pub use assessment_repo::AssessmentRepo;
pub use property_repo::PropertyRepo;
