pub mod charset;
pub mod ec_level;
pub mod error;
pub mod format;
pub mod metadata;
pub mod output;

pub use charset::*;
pub use ec_level::*;
pub use error::*;
pub use format::*;
pub use metadata::*;
pub use output::*;
