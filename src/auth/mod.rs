mod claims;
mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub(crate) mod extractors;

pub use claims::Claims;
pub use extractors::AuthUser;
pub use handlers::{public_routes, session_routes};
