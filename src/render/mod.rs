//! Turning a map into draw calls.

pub mod backend;
pub mod compositor;
pub mod macroquad_backend;
pub mod resolver;
pub mod shapes;
