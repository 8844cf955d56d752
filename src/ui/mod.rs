pub mod message;
pub mod sidebar;
pub mod theme;
