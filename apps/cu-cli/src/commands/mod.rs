pub mod ack;
pub mod check;
pub mod handlers;
pub mod process;
