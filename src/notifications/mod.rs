pub mod handlers;

pub use handlers::{default_notifications, router};
