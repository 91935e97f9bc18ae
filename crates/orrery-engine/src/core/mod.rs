pub mod body;
pub mod color;
pub mod frame_loop;
pub mod system;
pub mod time;
