mod file;

pub use file::{FileContent, FileInfo, FilePatch, FileSummary, NewFile};
