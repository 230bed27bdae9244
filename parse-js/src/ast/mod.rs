pub mod class_or_object;
pub mod expr;
pub mod func;
pub mod jsx;
pub mod node;
pub mod pat;
pub mod stmt;
