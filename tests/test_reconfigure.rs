mod test_utils;

use log::*;
use secure_layout::{writers::SecureLogWriter, Logger};
use test_utils::{layout, read_records};

#[test]
fn test_reconfigure() {
    let dir = temp_dir::TempDir::new().unwrap();
    let log_file = dir.path().join("app.log");
    let audit_file = dir.path().join("audit.log");

    let audit = SecureLogWriter::to_file(layout("%p %m"), &audit_file, false)
        .unwrap()
        .max_log_level(LevelFilter::Warn);
    let handle = Logger::try_with_str("info")
        .unwrap()
        .layout(layout("%p %m%n"))
        .log_to_file(&log_file)
        .add_writer(Box::new(audit))
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));

    error!("first®");
    info!("second\nINFO injected®");
    debug!("not written");

    handle
        .set_layout(layout("%-5p %c - %m%n"))
        .unwrap_or_else(|e| panic!("Reconfiguration failed with {e}"));
    warn!("third");

    handle.shutdown();
    drop(handle);

    let app_log = std::fs::read_to_string(&log_file).unwrap();
    assert_eq!(
        read_records(&app_log, &layout("%m")),
        vec![
            "ERROR first®".to_string(),
            "INFO second\nINFO injected®".to_string(),
            "WARN  test_reconfigure - third".to_string(),
        ]
    );

    let audit_log = std::fs::read_to_string(&audit_file).unwrap();
    assert_eq!(audit_log, "ERROR first®®®\nWARN third®\n");
}
