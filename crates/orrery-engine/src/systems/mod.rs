pub mod draw2d;
pub mod scene_pass;
