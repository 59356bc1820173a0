pub mod provider;
pub mod relay;
pub mod storage;
