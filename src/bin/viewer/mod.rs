pub mod app;
pub mod ui;
pub mod viewer_main;
