pub mod render;
pub mod session;
pub mod state;

pub use render::render_result;
pub use session::Session;
