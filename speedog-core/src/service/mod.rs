mod error;
mod shutdown;
mod speedog;


pub use error::ServiceError;
pub use shutdown::ShutdownHandle;
pub use speedog::{IDLE_TICK, RUNTIME_SHUTDOWN_TIMEOUT, SpeedogService};
