//! Renders configuration reference documentation for the deployers.
//!
//! Every `*.tpl` file under a root directory is rendered with minijinja
//! against [`TemplateData`] and written next to the template without the
//! suffix. Templates can call the helpers registered in [`helpers`] and the
//! bundled partials in [`partials`].

pub mod data;
pub mod deployers;
pub mod engine;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod partials;
pub mod schema;
pub mod walker;

pub use data::TemplateData;
pub use engine::TemplateEngine;
pub use error::DocsError;
pub use generator::{DocsGenerator, DEFAULT_SUFFIX, OUTPUT_MODE};
