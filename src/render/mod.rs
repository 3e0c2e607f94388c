pub mod border;
pub mod engine;
