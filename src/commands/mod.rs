//! Command implementations

mod add;
mod reset;
mod scan;
mod session;
mod status;

pub use add::add;
pub use reset::reset;
pub use scan::scan;
pub use status::status;
