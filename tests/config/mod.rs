pub mod fs;
pub mod mock;
