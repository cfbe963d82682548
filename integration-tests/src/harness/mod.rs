mod backend;
mod fixture;
pub mod tracing;

pub use backend::{EmptyProcessTable, RecordingBackend};
pub use fixture::{Fixture, wait_until};
pub use self::tracing::{CapturedEvent, captured_events};

use speedog_core::conf::load_config;
use speedog_core::controller::SpeedController;
use speedog_core::service::SpeedogService;

/// Load the fixture's config and build a service around `backend`.
pub fn build_service(fixture: &Fixture, backend: &RecordingBackend) -> SpeedogService {
    let config = load_config(&fixture.config_path).expect("fixture config must load");
    let controller = SpeedController::new(
        &config.game,
        Box::new(backend.clone()),
        Box::new(EmptyProcessTable),
    );

    SpeedogService::with_controller(config, controller).expect("failed to build service")
}
