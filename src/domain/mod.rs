pub mod entity;
pub mod map;
pub mod rules;
pub mod tile;
