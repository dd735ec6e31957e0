pub mod archive;
pub mod entry;

pub use archive::Archive;
pub use entry::{format_timestamp, Entry, UNTITLED};
