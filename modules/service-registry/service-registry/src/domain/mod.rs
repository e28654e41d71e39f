pub mod error;
pub mod local_resolver;
pub mod service;
pub mod storage;
