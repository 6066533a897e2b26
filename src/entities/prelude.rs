pub use super::job_applications::Entity as JobApplications;
pub use super::users::Entity as Users;
