//! Presentation: keyboards, labels, and the text of every screen.
pub mod buttons;
pub mod keyboards;
pub mod style;
pub mod texts;
