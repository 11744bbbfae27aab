pub use catalog::*;
pub use deck::*;
#[cfg(feature = "glib")]
pub use driver::*;
pub use engine::*;
pub use error::*;
pub use hint::*;
pub use palette::*;
pub use progress::*;
pub use session::*;
pub use signal::*;

mod catalog;
mod deck;
#[cfg(feature = "glib")]
mod driver;
mod engine;
mod error;
mod hint;
mod palette;
mod progress;
mod session;
mod signal;
