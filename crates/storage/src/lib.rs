#![forbid(unsafe_code)]

pub mod json_file;
mod mapping;
pub mod progress_store;
pub mod repository;
pub mod word_source;

pub use json_file::JsonFileRepository;
pub use progress_store::ProgressStore;
pub use repository::{InMemoryRepository, StateRepository, StorageError};
pub use word_source::{WordSourceError, load_word_store, parse_word_store};
