// Adapters layer: concrete implementations for external systems (http, serial, audio backend, observers).

pub mod http;
pub mod media;
pub mod observers;
pub mod serial;
