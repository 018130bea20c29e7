pub mod source_service;
pub mod thumbnail;
pub mod tree;
