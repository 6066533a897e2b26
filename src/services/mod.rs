pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod job_service;
pub mod job_service_impl;
pub use job_service::{JobError, JobService};
pub use job_service_impl::SeaOrmJobService;
