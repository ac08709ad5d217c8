/// UI module exports
pub mod callbacks;
pub mod components;
pub mod popup;
pub mod state;
pub mod tasks;
pub mod web_app;
