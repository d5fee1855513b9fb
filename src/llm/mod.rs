pub mod prompt;
pub mod select_file;

pub use select_file::select_file;
