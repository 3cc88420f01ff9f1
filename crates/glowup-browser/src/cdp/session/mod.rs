//! Operations on a single attached tab, split by DevTools domain.

mod core;
mod dom;
mod input;
mod js;
mod navigation;

pub use self::core::PageSession;
