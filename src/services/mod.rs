pub mod case_study;
pub mod editors;
pub mod grading_service;
pub mod publish_validator;
