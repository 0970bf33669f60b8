//! Header/footer view data for templates.

mod builder;
mod data;
mod region;

pub use builder::{build_view_data, BuiltView};
pub use data::ViewData;
pub use region::{BuildRejected, Region};
