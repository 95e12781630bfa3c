pub mod admin;
pub use self::admin::{dashboard, login_page};

pub mod health;
pub use self::health::health;

pub mod session;
pub mod types;
