pub mod images;
pub mod player;
pub mod rotation;
