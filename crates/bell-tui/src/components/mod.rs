pub mod header;
pub mod log_panel;
pub mod notification_panel;
