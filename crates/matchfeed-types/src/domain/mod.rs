pub mod card;
pub mod feed;
pub mod location;
pub mod status;

pub use card::*;
pub use feed::*;
pub use location::*;
pub use status::*;
