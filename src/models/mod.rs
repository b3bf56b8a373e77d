pub mod event;
pub mod generation;
pub mod image_model;
pub mod telegram;
