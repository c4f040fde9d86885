//! Caption styling in reference-resolution units
//!
//! The authoring surface sends partial, loosely typed style objects. Everything
//! downstream consumes only [`StylingDescriptor`], which is produced by a
//! single merge step, [`resolve_styling`], that fills defaults and clamps
//! every field into its supported range.

mod descriptor;
mod resolve;

pub use descriptor::{
    AnimationMode, FontWeight, HighlightStyle, StylingDescriptor, TextAlign, VerticalPosition,
};
pub use resolve::{resolve_styling, PartialHighlight, PartialStylingDescriptor};
