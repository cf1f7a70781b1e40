//! Sprite rendering for a fixed-logical-resolution 2D game: GPU context and
//! surface setup, the y-down screen-space camera, one textured-quad pipeline,
//! and texture upload with a visible placeholder fallback.

pub mod camera;
pub mod gpu_context;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::Camera2D;
pub use gpu_context::GpuContext;
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::SpriteVertex;
