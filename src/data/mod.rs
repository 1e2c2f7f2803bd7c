pub mod account;
pub mod authoring;
pub mod class_level;
pub mod content;
pub mod dashboard;
pub mod feedback;
pub mod quiz;
pub mod results;
pub mod session;
