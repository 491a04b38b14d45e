pub mod advisor;
pub mod factors;
pub mod signals;
pub mod window_selector;

pub use advisor::advise;
pub use factors::ScoringEngine;
