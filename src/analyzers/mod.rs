pub mod aggregate;
pub mod identity;
pub mod ranking;
pub mod window;
