//! Data models for the Community CMS backend.
//!
//! Wire names are camelCase to match the site frontend and admin SPA.

mod article;
pub mod category;
mod filter;
mod gallery;
mod member;
mod project;
pub mod slug;

pub use article::*;
pub use category::*;
pub use filter::*;
pub use gallery::*;
pub use member::*;
pub use project::*;
