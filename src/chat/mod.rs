mod dto;
pub mod handlers;
pub mod rules;

pub use handlers::router;
