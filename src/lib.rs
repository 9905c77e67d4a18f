pub mod color;
pub mod import;
pub mod palette;
pub mod persist;
pub mod profile;
pub mod quantize;
pub mod state;
