pub mod update_processor;
