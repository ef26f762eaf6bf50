//! Test helpers shared by the rikiki test binaries: logging setup and
//! assertions on problem-details error responses.

pub mod logging;
pub mod problem_details;
