pub mod gateway;
pub mod notifier;
pub mod session;
pub mod storage;
