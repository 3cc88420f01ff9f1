//! Chrome-backed implementation of the browser driver contract.
//!
//! Each launch starts a dedicated Chrome process bound to a profile
//! directory, so cookies written during one run are visible to the next.

mod launcher;
mod page;

pub use launcher::{ChromeDriver, ChromeDriverConfig};
pub use page::ChromePage;

#[cfg(test)]
#[path = "chrome_tests.rs"]
mod tests;
