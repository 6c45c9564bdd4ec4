pub mod confetti;
pub mod geometry;
pub mod svg;
pub mod wheel;
