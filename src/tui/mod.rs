//! Terminal user interface.

mod app;
mod event;
mod input;
mod paint;
mod style;

pub use app::App;
