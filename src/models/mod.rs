pub mod advisory;
pub mod condition;
pub mod forecast;
pub mod sample;
pub mod window;

pub use advisory::*;
pub use condition::*;
pub use forecast::*;
pub use sample::*;
pub use window::*;
