//! Route paths.

pub const POST_AUTH_REGISTER: &str = "/auth/register";
pub const POST_AUTH_LOGIN: &str = "/auth/login";
pub const POST_AUTH_REFRESH: &str = "/auth/refresh";
pub const POST_AUTH_LOGOUT: &str = "/auth/logout";
pub const GET_AUTH_ME: &str = "/auth/me";
pub const TASKS: &str = "/tasks";
pub const TASKS_ID: &str = "/tasks/{task_id}";
