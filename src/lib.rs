/// slideframe: a picture frame that rotates through a list of images on a
/// fixed cadence, with pause/resume and a rendered border.
pub mod config;
pub mod core;
pub mod error;
pub mod media;
pub mod playlist;
pub mod render;
