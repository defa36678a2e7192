pub mod app;
pub mod input;

pub use app::App;
