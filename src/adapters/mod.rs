// Adapters layer: concrete implementations for external systems (cart sources, storage).

pub mod cart_source;
pub mod file_source;
pub mod http_source;
pub mod storage;

pub use cart_source::CartSource;
pub use file_source::FileSource;
pub use http_source::HttpSource;
pub use storage::LocalStorage;
