// Service module exports

pub mod countdown;
pub mod database;
pub mod event;
pub mod holiday;
pub mod image;
pub mod notification;
pub mod settings;
