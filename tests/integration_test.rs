use qrkeep::history::{self, HistoryStore, Outcome, HISTORY_KEY, MAX_HISTORY};
use qrkeep::payload::encode::{encode_email, encode_wifi};
use qrkeep::payload::{classify, ContentType};
use qrkeep::scan::{BarcodeEvent, ScanSession};
use qrkeep::store::{self, Backend, BlobStore, FileStore, SqliteStore};

fn payloads(records: &[history::ScanRecord]) -> Vec<&str> {
    records.iter().map(|r| r.payload.as_str()).collect()
}

#[test]
fn sqlite_history_survives_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("qrkeep.db");

    let mut history = HistoryStore::open(SqliteStore::new(&db)).unwrap();
    history.append("https://example.com", ContentType::Url);
    history.append(&encode_wifi("HomeNet", Some("secret"), None), ContentType::Wifi);
    let before = history.list();
    history.close();

    let reopened = HistoryStore::open(SqliteStore::new(&db)).unwrap();
    assert_eq!(reopened.list(), before);
    assert_eq!(
        payloads(&before),
        vec!["WIFI:T:WPA;S:HomeNet;P:secret;;", "https://example.com"]
    );
}

#[test]
fn file_history_survives_restart() {
    let tmp = tempfile::tempdir().unwrap();

    let mut history = HistoryStore::open(FileStore::new(tmp.path())).unwrap();
    history.append("one", ContentType::Text);
    history.append("two", ContentType::Text);
    let before = history.list();
    history.close();

    let reopened = HistoryStore::open(FileStore::new(tmp.path())).unwrap();
    assert_eq!(reopened.list(), before);
}

#[test]
fn persisted_blob_is_a_json_array() {
    let tmp = tempfile::tempdir().unwrap();

    let mut history = HistoryStore::open(FileStore::new(tmp.path())).unwrap();
    history.append("tel:123", ContentType::Phone);
    let mut backend = history.close();
    backend.open().unwrap();
    let blob = backend.get(HISTORY_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

    let entry = &value[0];
    assert_eq!(entry["type"], "PHONE");
    assert_eq!(entry["data"], "tel:123");
    assert!(entry["id"].is_string());
    assert!(entry["timestamp"].is_i64());
}

#[test]
fn cap_holds_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = store::backend_for(Backend::Sqlite, tmp.path());
    let mut history = HistoryStore::open(backend).unwrap();

    for i in 0..=MAX_HISTORY {
        history.append(&format!("code-{i}"), ContentType::Text);
    }
    history.close();

    let reopened = HistoryStore::open(store::backend_for(Backend::Sqlite, tmp.path())).unwrap();
    let list = reopened.list();
    assert_eq!(list.len(), MAX_HISTORY);
    assert!(list.iter().all(|r| r.payload != "code-0"));
}

#[test]
fn scan_session_records_and_filters() {
    let tmp = tempfile::tempdir().unwrap();
    let mut history = HistoryStore::open(FileStore::new(tmp.path())).unwrap();
    let mut session = ScanSession::new(true);

    let scans = [
        "https://x.com",
        "WIFI:T:WPA;S:net;P:pw;;",
        "tel:123",
        "hello",
    ];
    for text in scans {
        let result = session.on_barcode(BarcodeEvent::qr(text), &mut history).unwrap();
        assert_eq!(result.content_type, classify(text));
        session.dismiss();
    }

    let all = history.list();
    assert_eq!(payloads(&all), vec!["hello", "tel:123", "WIFI:T:WPA;S:net;P:pw;;", "https://x.com"]);

    let wifi = history::filter(&all, "wifi");
    assert_eq!(wifi.len(), 1);
    assert_eq!(wifi[0].content_type, ContentType::Wifi);
}

#[test]
fn delete_and_clear_are_idempotent_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let mut history = HistoryStore::open(SqliteStore::new(tmp.path().join("q.db"))).unwrap();
    history.append(&encode_email("a@b.com", Some("Hi"), Some("There")), ContentType::Email);
    history.append("note", ContentType::Text);

    let id = history.list()[1].id.clone();
    assert!(matches!(history.delete_by_id(&id), Outcome::Deleted));
    assert!(matches!(history.delete_by_id(&id), Outcome::NotFound));
    assert_eq!(payloads(&history.list()), vec!["note"]);

    assert!(matches!(history.clear(), Outcome::Cleared));
    assert!(matches!(history.clear(), Outcome::Cleared));
    assert!(history.list().is_empty());
}

/// Two writers, each with its own handle on the same backing store, append
/// distinct payloads in parallel. Every reported append must be on disk.
fn parallel_writers_keep_every_append<S, F>(open_backend: F)
where
    S: BlobStore + Send + 'static,
    F: Fn() -> S,
{
    const PER_WRITER: usize = 40;

    let writers: Vec<_> = ["left", "right"]
        .into_iter()
        .map(|name| {
            let mut history = HistoryStore::open(open_backend()).unwrap();
            std::thread::spawn(move || {
                let appended = (0..PER_WRITER)
                    .filter(|i| {
                        let payload = format!("{name}-{i}");
                        matches!(history.append(&payload, ContentType::Text), Outcome::Appended(_))
                    })
                    .count();
                history.close();
                appended
            })
        })
        .collect();

    let appended: usize = writers.into_iter().map(|w| w.join().unwrap()).sum();
    assert_eq!(appended, 2 * PER_WRITER);

    let history = HistoryStore::open(open_backend()).unwrap();
    let records = history.list();
    assert_eq!(records.len(), 2 * PER_WRITER);

    // each writer's own records stay in the order it wrote them
    for name in ["left", "right"] {
        let prefix = format!("{name}-");
        let mine: Vec<&str> = payloads(&records)
            .into_iter()
            .filter(|p| p.starts_with(&prefix))
            .collect();
        let expected: Vec<String> = (0..PER_WRITER).rev().map(|i| format!("{prefix}{i}")).collect();
        assert_eq!(mine, expected);
    }
}

#[test]
fn sqlite_parallel_writers_lose_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("qrkeep.db");
    parallel_writers_keep_every_append(|| SqliteStore::new(&db));
}

#[test]
fn file_parallel_writers_lose_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();
    parallel_writers_keep_every_append(|| FileStore::new(&dir));
}
