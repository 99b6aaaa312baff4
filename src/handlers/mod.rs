mod hello;

pub use hello::{GREETING, hello};
