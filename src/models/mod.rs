pub mod job;
pub mod user;
pub mod validation;

pub use job::{JobApplication, JobApplicationInput, JobChanges};
pub use user::{LoginRequest, SignupRequest, User, UserInfo};
