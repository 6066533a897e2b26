pub mod prelude;

pub mod job_applications;
pub mod users;
