// Presentation layer - Element board and the local control surface
pub mod app_state;
pub mod display_board;
pub mod handlers;
