pub mod locale;
pub mod nationality;

pub use locale::*;
pub use nationality::*;
