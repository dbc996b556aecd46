pub mod availability;
pub mod rooms;

pub use availability::*;
pub use rooms::*;
