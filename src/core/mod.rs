mod names;

pub use names::{Name, NameTable};
