//! Remote file storage.
//!
//! The pipeline reads pending memos from one cloud folder and writes
//! transcripts back to another. [`FileStore`] is the seam: production code
//! talks to Dropbox through [`DropboxStore`], tests swap in
//! [`MockFileStore`].

pub mod dropbox;
pub mod store;

pub use dropbox::DropboxStore;
pub use store::{FileStore, MockFileStore, RemoteEntry};
