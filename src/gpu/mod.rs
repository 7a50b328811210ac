mod buffers;
mod context;
mod render;

pub use buffers::FieldBuffers;
pub use context::GpuContext;
pub use render::SurfacePipeline;
