mod check_config;
mod init;
mod migrate;
mod users;

pub use check_config::cmd_check_config;
pub use init::cmd_init;
pub use migrate::cmd_migrate;
pub use users::cmd_list_users;
