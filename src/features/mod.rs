pub mod window;

pub use window::{build_future, build_past, WindowBuilder};
