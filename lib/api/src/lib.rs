//! # edurec API
//!
//! REST surface for the edurec learning portal. Handlers stay thin: they
//! parse input, call the core pipelines or the user store through the
//! shared [`AppContext`], and emit pages through the [`PageRenderer`]
//! seam.

pub mod render;
pub mod rest;

pub use render::{JsonRenderer, PageRenderer};
pub use rest::{AppContext, RestApi};
