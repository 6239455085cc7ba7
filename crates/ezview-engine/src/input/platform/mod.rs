//! Window-system adapters.

mod winit;

pub use self::winit::translate_window_event;
