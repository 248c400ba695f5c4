pub mod catalogs;
pub mod completion_client;
pub mod filesystem;
