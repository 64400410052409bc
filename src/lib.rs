pub mod cli;
pub mod config;
pub mod error;
pub mod node;
pub mod record;
pub mod render;
pub mod style;

pub use error::TreeError;
pub use node::{Kind, Node, Number, Scalar};
pub use render::TreePrinter;
pub use style::{Palette, Style};
