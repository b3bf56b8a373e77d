pub mod image_generation_service;
pub mod session_service;
pub mod telegram_service;
