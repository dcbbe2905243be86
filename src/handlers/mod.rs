// handlers/mod.rs - route handlers grouped by surface
//
// Public:  /, /health
// Session: /api/me, /api/session (session cookie resolved by middleware)

pub mod me;
pub mod public;
pub mod session;

pub use me::{me_delete, me_get};
pub use public::{health, not_found, root};
pub use session::session_post;
