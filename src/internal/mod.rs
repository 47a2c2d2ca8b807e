pub mod arena;
pub mod id;
