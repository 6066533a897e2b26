pub mod session {

    /// Session key holding the authenticated user's id.
    pub const USER_ID_KEY: &str = "user_id";

    pub const COOKIE_NAME: &str = "jobtracker.sid";
}

pub mod limits {

    /// Records per page when listing a user's job applications.
    pub const PAGE_SIZE: u64 = 10;

    /// Highest page whose row offset still fits a signed 64-bit SQL `OFFSET`.
    pub const MAX_PAGE: u64 = i64::MAX.unsigned_abs() / PAGE_SIZE;
}
