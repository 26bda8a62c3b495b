//! Blob storage infrastructure module

mod fs_blob_store;

pub use fs_blob_store::FsBlobStore;
