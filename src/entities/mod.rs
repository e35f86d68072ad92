pub mod actor;
pub mod country;
pub mod genre;
pub mod movie;
