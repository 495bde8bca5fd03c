pub mod school;
pub mod student;
pub mod user;

pub use school::{NewSchool, School, SchoolUpdate};
pub use student::{NewStudent, StudentRecord};
pub use user::{NewUser, Role, User};
