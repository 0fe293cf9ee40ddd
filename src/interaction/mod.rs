pub mod gesture;
pub mod hand;
pub mod session;
