pub mod geo;
pub mod location;
pub mod mode;
pub mod session;
pub mod state;
