pub mod raster;
pub mod source;
