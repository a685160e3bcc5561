//! File container: writer and reader facades over the on-disk journal
//!
//! - [`format`] - header and journal record layout
//! - [`journal`] - append and replay
//! - [`writer`] - [`Writer`], the mutating handle
//! - [`reader`] - [`Reader`], the read-only handle

pub mod format;
pub mod journal;
pub mod reader;
mod session;
pub mod writer;

pub(crate) use session::run_blocking;

pub use format::{ContainerHeader, JournalRecord, FORMAT_VERSION, MAGIC};
pub use journal::ContainerLock;
pub use reader::Reader;
pub use writer::{Writer, WriterOptions};
