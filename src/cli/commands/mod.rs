pub mod play;
pub mod train;
