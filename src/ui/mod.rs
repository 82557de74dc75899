pub mod input;
pub mod interaction;
pub mod tooltip;
pub mod window;
