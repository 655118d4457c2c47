pub mod config;
pub mod error;
pub mod location;
pub mod session;
pub mod source;

pub use config::{Config, FeedConfig, FetchConfig, resolve_data_dir};
pub use error::{Error, Result};
pub use location::{LocalStorage, LocationStore};
pub use session::{FeedSession, RetryPolicy};
pub use source::{FeedSource, Recording, ReplaySource};
