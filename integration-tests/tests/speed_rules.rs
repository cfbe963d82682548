use integration_tests::harness::{Fixture, RecordingBackend, build_service, wait_until};
use pretty_assertions::assert_eq;
use std::time::Duration;

const RULES: &str = "\
[game]
Process_Name=Game.exe

[nodes]
FirstBoss={Boss1, 3.0}
Farming={ Stage 2-4 , 2.0 }
Dupe={Boss1, 5.0}
";

#[test]
fn matched_nodes_change_speed_and_shutdown_resets() {
    // Arrange
    let fixture = Fixture::new(RULES);
    let backend = RecordingBackend::new();
    let mut service = build_service(&fixture, &backend);
    service.start().unwrap();

    // Act
    fixture.append_log(
        "10:00:00 [pipeline_data.name=Boss1] | enter\n\
         10:00:01 [pipeline_data.name=Unknown] | enter\n\
         10:00:02 [node_name=Boss1] result.name=Boss1\n\
         10:00:03 [pipeline_data.name=Stage 2-4] | complete\n",
    );
    let applied = wait_until(|| backend.speeds().len() == 2, Duration::from_secs(3));
    service.shutdown();

    // Assert: the later duplicate rule for Boss1 wins
    assert!(applied);
    assert_eq!(backend.speeds(), vec![5.0, 2.0, 1.0]);
}

#[test]
fn lines_written_in_pieces_fire_once() {
    // Arrange
    let fixture = Fixture::new(RULES);
    let backend = RecordingBackend::new();
    let mut service = build_service(&fixture, &backend);
    service.start().unwrap();

    // Act
    fixture.append_log("[pipeline_data.name=Stage 2");
    std::thread::sleep(Duration::from_millis(200));
    let before_terminator = backend.speeds();
    fixture.append_log("-4] | enter\n");
    let applied = wait_until(|| !backend.speeds().is_empty(), Duration::from_secs(3));
    std::thread::sleep(Duration::from_millis(200));
    let after = backend.speeds();
    service.shutdown();

    // Assert
    assert!(before_terminator.is_empty());
    assert!(applied);
    assert_eq!(after, vec![2.0]);
}

#[test]
fn truncated_log_is_read_from_the_start() {
    // Arrange
    let fixture = Fixture::new(RULES);
    let backend = RecordingBackend::new();
    let mut service = build_service(&fixture, &backend);
    service.start().unwrap();
    fixture.append_log(&"padding line that is longer than the rotated file\n".repeat(4));
    std::thread::sleep(Duration::from_millis(200));

    // Act
    fixture.truncate_log("[pipeline_data.name=Boss1] | enter\n");
    let applied = wait_until(|| !backend.speeds().is_empty(), Duration::from_secs(3));
    service.shutdown();

    // Assert
    assert!(applied);
    assert_eq!(backend.speeds(), vec![5.0, 1.0]);
}

#[test]
fn unreachable_process_is_connected_on_a_later_match() {
    // Arrange
    let fixture = Fixture::new(RULES);
    let backend = RecordingBackend::new();
    backend.set_reachable(false);
    let mut service = build_service(&fixture, &backend);
    service.start().unwrap();
    assert!(!service.controller().is_connected());

    // Act: first match while the game is down, second after it comes up
    fixture.append_log("[pipeline_data.name=Stage 2-4] | enter\n");
    std::thread::sleep(Duration::from_millis(200));
    backend.set_reachable(true);
    fixture.append_log("[pipeline_data.name=Boss1] | enter\n");
    let applied = wait_until(|| !backend.speeds().is_empty(), Duration::from_secs(3));

    // Assert
    assert!(applied);
    assert!(service.controller().is_connected());
    assert_eq!(service.controller().current_speed(), 5.0);
    service.shutdown();
    assert_eq!(backend.speeds(), vec![5.0, 1.0]);
}
