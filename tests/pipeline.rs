use anyhow::Result;
use obfuscator::io::cloud::{ErrorKind, FakeObjectIO, ObjectIO};
use obfuscator::testing::{generated_csv, sample_csv, seeded_storage};
use obfuscator::{ErrorCategory, Format, Obfuscator, ObfuscatorConfig, SENTINEL, Table};
use std::io::Write;
use std::sync::{Arc, Mutex};

const SOURCE: &[u8] = b"id,name,email\n1,John Doe,john.doe@example.com\n";

fn proto_obfuscator(storage: FakeObjectIO) -> Obfuscator<FakeObjectIO> {
    Obfuscator::new(storage).with_config(ObfuscatorConfig {
        uri_scheme: "proto".to_string(),
    })
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn masks_requested_csv_columns() -> Result<()> {
    let ob = proto_obfuscator(seeded_storage("bucket1", "data.csv", SOURCE));
    let out = ob.process(
        r#"{"file_to_obfuscate": "proto://bucket1/data.csv", "pii_fields": ["name","email"]}"#,
    )?;
    let out = text(out.as_bytes());
    assert!(out.contains("***,***"), "{out}");
    assert!(out.contains('1'));
    assert_eq!(out, "id,name,email\n1,***,***\n");
    Ok(())
}

#[test]
fn no_fields_leaves_content_unchanged() -> Result<()> {
    let ob = proto_obfuscator(seeded_storage("bucket1", "data.csv", SOURCE));
    for request in [
        r#"{"file_to_obfuscate": "proto://bucket1/data.csv", "pii_fields": []}"#,
        r#"{"file_to_obfuscate": "proto://bucket1/data.csv"}"#,
    ] {
        let out = ob.process(request)?;
        assert_eq!(out.as_bytes(), SOURCE);
        let out = text(out.as_bytes());
        assert!(out.contains("John Doe"));
        assert!(out.contains("john.doe@example.com"));
    }
    Ok(())
}

#[test]
fn malformed_location_is_invalid_input() {
    let err = Obfuscator::new(FakeObjectIO::new())
        .process(r#"{"file_to_obfuscate": "not-a-valid-uri"}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorCategory::InvalidInput);
    assert!(err.to_string().contains("Invalid S3 URI format"));
}

#[test]
fn request_validation_errors() {
    let ob = Obfuscator::new(FakeObjectIO::new());
    let cases = [
        ("{not json", "Invalid JSON input"),
        (r#"{"pii_fields": ["a"]}"#, "Missing required S3 file location."),
        (r#"{"file_to_obfuscate": ""}"#, "Missing required S3 file location."),
        (r#"{"file_to_obfuscate": "s3://bucket/"}"#, "Invalid S3 URI format"),
        (r#"{"file_to_obfuscate": "s3:///key.csv"}"#, "Invalid S3 URI format"),
        (r#"{"file_to_obfuscate": "s3://bucket/data.xml"}"#, "Unsupported file format: xml"),
        (r#"{"file_to_obfuscate": "s3://bucket/data.CSV"}"#, "Unsupported file format: CSV"),
    ];
    for (request, expected) in cases {
        let err = ob.process(request).unwrap_err();
        assert_eq!(err.kind(), ErrorCategory::InvalidInput, "{request}");
        assert!(err.to_string().contains(expected), "{request}: {err}");
    }
}

#[test]
fn missing_object_is_not_found() {
    let err = Obfuscator::new(FakeObjectIO::new())
        .process(r#"{"file_to_obfuscate": "s3://bucket/nope.parquet"}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorCategory::NotFound);
    assert_eq!(err.to_string(), "File not found: bucket/nope.parquet");
}

#[test]
fn backend_failures_are_storage_errors() {
    let storage = FakeObjectIO::new();
    storage.fail_with("bucket", "slow.csv", ErrorKind::Timeout);
    let err = Obfuscator::new(storage)
        .process(r#"{"file_to_obfuscate": "s3://bucket/slow.csv"}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorCategory::Storage);
    assert!(err.to_string().contains("bucket/slow.csv"));
}

#[test]
fn corrupt_object_is_decode_error() {
    let storage = seeded_storage("bucket", "broken.json", b"[{\"a\": 1}, 7]");
    let err = Obfuscator::new(storage)
        .process(r#"{"file_to_obfuscate": "s3://bucket/broken.json"}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorCategory::Decode);
    assert!(err.to_string().starts_with("Error reading json file"), "{err}");
}

#[test]
fn empty_objects_produce_valid_output() -> Result<()> {
    let storage = FakeObjectIO::new();
    for format in Format::ALL {
        storage.put_object("bucket", &format!("empty.{format}"), b"")?;
    }
    let ob = Obfuscator::new(storage);
    for format in Format::ALL {
        let out = ob.process(&format!(
            r#"{{"file_to_obfuscate": "s3://bucket/empty.{format}", "pii_fields": ["name"]}}"#
        ))?;
        assert!(!out.is_empty(), "{format}");
        let table = obfuscator::io::decode(format, out.as_bytes().to_vec())?;
        assert_eq!(table, Table::empty(), "{format}");
    }
    Ok(())
}

#[test]
fn header_only_csv_keeps_header() -> Result<()> {
    let storage = seeded_storage("bucket", "h.csv", b"id,name\n");
    let out = Obfuscator::new(storage)
        .process(r#"{"file_to_obfuscate": "s3://bucket/h.csv", "pii_fields": ["name"]}"#)?;
    assert_eq!(out.as_bytes(), b"id,name\n");
    Ok(())
}

#[test]
fn json_array_and_lines_come_back_as_lines() -> Result<()> {
    let storage = FakeObjectIO::new();
    storage.put_object(
        "bucket",
        "array.json",
        br#"[{"id": 1, "name": "Ann", "tags": ["x"]}, {"id": 2, "name": "Bob", "extra": true}]"#,
    )?;
    storage.put_object(
        "bucket",
        "lines.json",
        b"{\"id\": 1, \"name\": \"Ann\"}\n\n{\"id\": 2, \"name\": null}\n",
    )?;
    let ob = Obfuscator::new(storage);

    let out = ob.process(
        r#"{"file_to_obfuscate": "s3://bucket/array.json", "pii_fields": ["name"]}"#,
    )?;
    assert_eq!(
        text(out.as_bytes()),
        "{\"id\":1,\"name\":\"***\",\"tags\":\"[\\\"x\\\"]\",\"extra\":null}\n\
         {\"id\":2,\"name\":\"***\",\"tags\":null,\"extra\":true}\n"
    );

    let out = ob.process(
        r#"{"file_to_obfuscate": "s3://bucket/lines.json", "pii_fields": ["name"]}"#,
    )?;
    assert_eq!(
        text(out.as_bytes()),
        "{\"id\":1,\"name\":\"***\"}\n{\"id\":2,\"name\":\"***\"}\n"
    );
    Ok(())
}

#[test]
fn unmasked_json_integers_beyond_i64_are_exact() -> Result<()> {
    let storage = seeded_storage(
        "bucket",
        "ids.json",
        "{\"id\": 18446744073709551615, \"n\": \"x\"}\n",
    );
    let out = Obfuscator::new(storage)
        .process(r#"{"file_to_obfuscate": "s3://bucket/ids.json", "pii_fields": ["n"]}"#)?;
    assert_eq!(text(out.as_bytes()), "{\"id\":18446744073709551615,\"n\":\"***\"}\n");
    Ok(())
}

#[cfg(all(feature = "io-parquet", feature = "io-csv"))]
#[test]
fn parquet_end_to_end() -> Result<()> {
    use obfuscator::Scalar;
    use obfuscator::io::parquet::{read_parquet_table, write_parquet_table};

    let source = obfuscator::io::csv::read_csv_table(sample_csv())?;
    let storage = seeded_storage("bucket", "people.parquet", write_parquet_table(&source)?);
    let out = Obfuscator::new(storage).process(
        r#"{"file_to_obfuscate": "s3://bucket/people.parquet", "pii_fields": ["email", "score"]}"#,
    )?;
    assert_eq!(&out.as_bytes()[..4], b"PAR1");

    let masked = read_parquet_table(out.into_bytes())?;
    assert_eq!(masked.num_rows(), 3);
    assert_eq!(
        masked.column_names().collect::<Vec<_>>(),
        ["id", "name", "email", "score"]
    );
    for name in ["email", "score"] {
        let col = masked.column(name).expect("column present");
        assert!(col.values().iter().all(|v| v.as_str() == Some(SENTINEL)));
    }
    assert_eq!(masked.column("id"), source.column("id"));
    assert_eq!(
        masked.column("name").expect("column present").values()[0],
        Scalar::from("John Doe")
    );
    Ok(())
}

#[test]
fn large_csv_is_masked_in_order() -> Result<()> {
    let rows = 15_000;
    let source = generated_csv(rows);
    let storage = seeded_storage("bucket", "big/people.csv", &source);
    let out = Obfuscator::new(storage).process(
        r#"{"file_to_obfuscate": "s3://bucket/big/people.csv", "pii_fields": ["name", "email"]}"#,
    )?;
    let out = text(out.as_bytes());
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), rows + 1);
    assert_eq!(lines[0], "id,name,email,city");
    for (i, line) in lines[1..].iter().enumerate() {
        assert_eq!(*line, format!("{i},***,***,City {}", i % 97));
    }
    Ok(())
}

#[test]
fn shared_obfuscator_serves_threads() -> Result<()> {
    let ob = Arc::new(Obfuscator::new(seeded_storage(
        "bucket",
        "people.csv",
        sample_csv(),
    )));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ob = Arc::clone(&ob);
            std::thread::spawn(move || {
                ob.process(
                    r#"{"file_to_obfuscate": "s3://bucket/people.csv", "pii_fields": ["email"]}"#,
                )
                .map(|out| out.into_bytes())
            })
        })
        .collect();
    let mut outputs = Vec::new();
    for h in handles {
        outputs.push(h.join().expect("thread")?);
    }
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    Ok(())
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn injected_dispatch_receives_events() -> Result<()> {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let ob = Obfuscator::new(seeded_storage("bucket", "people.csv", sample_csv()))
        .with_dispatch(tracing::Dispatch::new(subscriber));
    ob.process(r#"{"file_to_obfuscate": "s3://bucket/people.csv", "pii_fields": ["name"]}"#)?;
    let _ = ob.process(r#"{"file_to_obfuscate": "s3://bucket/missing.csv"}"#);

    let logs = text(&captured.0.lock().expect("lock"));
    assert!(logs.contains("reading file from storage"), "{logs}");
    assert!(logs.contains("obfuscating PII fields"), "{logs}");
    assert!(logs.contains("file not found"), "{logs}");
    assert!(logs.contains("missing.csv"), "{logs}");
    Ok(())
}
