pub mod blocker;

pub use blocker::build_blocks;
