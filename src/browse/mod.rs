//! Browse screen orchestration: which sections exist, where their data comes
//! from, and when it is (re)loaded.

pub mod adapter;
pub mod binding;
pub mod gate;
pub mod presenter;
pub mod section;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use presenter::{BrowseEvent, BrowsePresenter, Focus};
