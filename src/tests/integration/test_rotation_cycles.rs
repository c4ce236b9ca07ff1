//! Long-running rotation: many entries against a small ceiling.

use crate::test_utilities::LoggerFixture;

#[test]
fn test_repeated_rotation_never_exceeds_ceiling_plus_one_entry() {
    let fx = LoggerFixture::new();
    let message = "This is a test message for log rotation. ".repeat(10);
    let max = 4 * 1024;
    fx.logger.configure_rotation(true, Some(max)).unwrap();

    let mut rotations = 0;
    let mut last_size = 0;
    let mut largest = 0;
    for i in 1..=300 {
        fx.logger.write(&format!("Entry #{i}: {message}"), "INFO").unwrap();
        let size = fx.size("main.log");
        if size < last_size {
            rotations += 1;
        }
        largest = largest.max(size);
        last_size = size;
    }

    assert!(rotations > 0, "expected at least one rotation");
    let entry_len = fx.lines("main.log")[0].len() as u64 + 1;
    assert!(largest < max + entry_len);
    assert!(fx.read("main.log").contains("Entry #300:"));
}

#[test]
fn test_rotation_is_per_file_under_per_caller_routing() {
    let fx = LoggerFixture::per_caller();
    fx.logger.configure_rotation(true, Some(256)).unwrap();

    for i in 0..20 {
        fx.logger
            .write_from(Some("noisy.rs"), &format!("noise {i} {}", "x".repeat(40)), "INFO")
            .unwrap();
    }
    fx.logger.write_from(Some("quiet.rs"), "only entry", "INFO").unwrap();

    assert!(fx.size("noisy.log") < 256 + 100);
    assert_eq!(fx.lines("quiet.log").len(), 1);
}
