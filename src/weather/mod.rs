pub mod handlers;
pub mod table;

pub use handlers::router;
