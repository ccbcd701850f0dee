//! Recursive tree operations and navigation.

pub mod cascade;
pub mod navigation;

pub use cascade::CascadeService;
pub use navigation::NavigationService;
