pub mod admin;
pub mod balance;
pub mod chain;
pub mod events;
pub mod fee;
pub mod init;
pub mod quote;
pub mod send;
pub mod status;
