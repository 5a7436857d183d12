pub mod aliases;
pub mod replay;
pub mod validation;
