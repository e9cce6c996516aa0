mod dto;
pub mod handlers;
pub mod model;

pub use handlers::router;
