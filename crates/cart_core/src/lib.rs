pub mod frame;
pub mod geom;
pub mod input;
pub mod replay;
pub mod time;
