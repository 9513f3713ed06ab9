pub mod cancel;
pub mod partition;
