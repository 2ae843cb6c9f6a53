pub mod cart;
pub mod item;
pub mod parameters;
pub mod root;
