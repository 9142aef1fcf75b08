// Module exports for models

pub mod event;
pub mod holiday;
pub mod settings;
