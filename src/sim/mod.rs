pub mod event;
pub mod scene;
pub mod session;
pub mod step;
pub mod store;
