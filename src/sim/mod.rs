pub mod framework;
pub mod reverb;
