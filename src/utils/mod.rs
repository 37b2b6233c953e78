// Shared low-level helpers

pub mod encoding;
pub mod io;
