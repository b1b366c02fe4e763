//! Terminal and SVG plotting.

pub mod ascii;
pub mod raster;
pub mod svg;

pub use ascii::{render_spectrum_plot, render_trace_plot};
pub use raster::write_raster_svg;
pub use svg::write_svg_plot;
