pub mod handlers;
mod tables;

pub use handlers::router;
