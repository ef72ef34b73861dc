pub mod models;
pub mod storage;
pub mod store;
pub mod view;
