//! Tests against a SQLite database on disk

use partpanel::prelude::*;
use partpanel::store::sqlite::SCHEMA;
use partpanel::store::PartLookup;
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

fn seed(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(
        "INSERT INTO parts (id, name, full_name, description, active, url, thumbnail)
             VALUES (1, 'ESP32-WROOM-32', NULL, 'WiFi/BT module', 1, '/part/1/', NULL);
         INSERT INTO part_attachments (id, part_id, comment, link, file_name, file_url) VALUES
             (11, 1, 'Datasheet v3.4', NULL, 'attachments/part/1/esp32.pdf',
              '/media/attachments/part/1/esp32.pdf'),
             (10, 1, 'Hardware design guidelines', 'https://x/hw.pdf', NULL, NULL),
             (12, 1, 'datasheet (errata)', 'https://x/errata.pdf', NULL, NULL);
         INSERT INTO part_parameter_templates (id, name, units) VALUES
             (1, 'Supply Voltage', 'V'),
             (2, 'Flash', 'MB');
         INSERT INTO part_parameters (id, part_id, template_id, name, units, data) VALUES
             (3, 1, 1, NULL, NULL, '3.3'),
             (4, 1, 2, NULL, NULL, '4'),
             (5, 1, NULL, 'Antenna', NULL, 'PCB');
         INSERT INTO settings (key, value) VALUES
             ('MAX_PARAMETERS', '2'),
             ('DATASHEET_COMMENT_KEYWORD', 'Datasheet');",
    )
    .unwrap();
}

fn open_seeded() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.db");
    seed(&path);
    let store = SqliteStore::open(&path).expect("Database should open read-only");
    (dir, store)
}

#[test]
fn test_build_from_database_settings() {
    let (_dir, store) = open_seeded();
    let resolver = BaseUrlResolver::new("http://localhost:8000/").unwrap();
    let builder = PanelContextBuilder::new(&store, &store, "0.16.0");

    let panel = builder
        .build(Some(&resolver), &PanelTarget::part(1))
        .expect("Part 1 should produce a panel");

    assert_eq!(panel.part.name, "ESP32-WROOM-32");

    let ids: Vec<i64> = panel.datasheets.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![11, 12]);
    assert_eq!(panel.datasheets[0].label, "esp32.pdf");
    assert_eq!(
        panel.datasheets[0].url,
        "http://localhost:8000/media/attachments/part/1/esp32.pdf"
    );

    // Limit of 2 from the settings table, applied after ordering.
    let names: Vec<&str> = panel.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Antenna", "Flash"]);
    assert_eq!(panel.parameters[1].units.as_deref(), Some("MB"));
}

#[test]
fn test_settings_file_overrides_database() {
    let (_dir, store) = open_seeded();
    let overrides = SettingsMap::new().with("MAX_PARAMETERS", "0");
    let layered = partpanel::config::LayeredConfig::new()
        .layer(&overrides)
        .layer(&store);
    let builder = PanelContextBuilder::new(&store, &layered, "test");

    let panel = builder.build(None, &PanelTarget::part(1)).unwrap();
    assert_eq!(panel.parameters.len(), 3);
}

#[test]
fn test_missing_part_is_absent() {
    let (_dir, store) = open_seeded();
    assert_eq!(store.find_part(PartId(404)).unwrap(), PartLookup::NotFound);

    let builder = PanelContextBuilder::new(&store, &store, "test");
    assert!(builder.build(None, &PanelTarget::part(404)).is_none());
}

#[test]
fn test_database_without_tables_degrades() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (id INTEGER)")
        .unwrap();

    let store = SqliteStore::open(&path).unwrap();
    let settings = PanelSettings::default();
    let builder = PanelContextBuilder::new(&store, &settings, "test");

    // Queries fail on missing tables; the panel is suppressed, not an error.
    assert!(store.find_part(PartId(1)).is_err());
    assert!(builder.build(None, &PanelTarget::part(1)).is_none());
    // Setting reads fail softly as well.
    assert_eq!(store.get_setting("MAX_PARAMETERS"), None);
}

#[test]
fn test_open_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let result = SqliteStore::open(&dir.path().join("nope.db"));
    assert!(result.is_err());
}
