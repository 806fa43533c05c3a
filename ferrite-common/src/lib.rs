pub mod config;
pub mod html;
pub mod macros;
pub mod util;
