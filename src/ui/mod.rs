pub mod chat_view;
pub mod connect;
pub mod main_window;
pub mod settings;
pub mod sidebar;
