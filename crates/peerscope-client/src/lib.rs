pub mod app;
pub mod cache;
pub mod connection;
pub mod dispatcher;
pub mod reconciler;
pub mod surface;
