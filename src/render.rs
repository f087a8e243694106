pub mod rasterizer;
pub mod scene;
