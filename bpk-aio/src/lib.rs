// bpk-aio/src/lib.rs
//! Asynchronous IO operations for bowerpick (filesystem, json, process)

pub mod fs;
pub mod json_io;
pub mod process;

// Re-export the primary async functions
pub use fs::{
    atomic_write_file, list_directory_files_async, path_exists_async, read_to_bytes_async,
};
pub use json_io::read_json_async;
pub use process::run_command_async;
