pub mod response;
pub mod session;

pub use response::ApiResponse;
pub use session::{
    cleared_session_cookie, extract_session_token, session_cookie, session_middleware, CurrentUser,
    Session,
};
