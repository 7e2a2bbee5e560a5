pub mod callback_handler;
pub mod index_handler;

pub use callback_handler::callback_handler;
pub use index_handler::index_handler;
