pub mod api;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod protocol;
pub mod rules;
pub mod scorer;
// cmd and reports are binary modules (declared in main.rs).

pub use error::{GradeError, GradeResult};
pub use scorer::Grader;
