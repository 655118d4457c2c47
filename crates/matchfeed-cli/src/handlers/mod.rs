pub mod location;
pub mod replay;
pub mod status;
