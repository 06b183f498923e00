// Server module entry point
// Listener creation, accept loop, connection tasks and signal handling

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;


pub use listener::create_listener;
pub use server_loop::serve;
pub use signal::start_signal_handler;
