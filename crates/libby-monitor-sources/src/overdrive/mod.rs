// OverDrive "Thunder" catalogue API (the backend behind Libby)
pub mod api;
pub mod client;

pub use client::ThunderClient;
