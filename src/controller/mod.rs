//! UI-independent behavior of the assistant window. Nothing here touches GTK,
//! so every flow can be driven from tests with a fake backend.

pub mod chat;
pub mod settings;
pub mod sidebar;
pub mod theme;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;
