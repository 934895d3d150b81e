use quakemap::plan_execution::{build_pipeline, execute_plan, load_plan};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log lines for assertions.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

fn write_plan(dir: &std::path::Path, boundaries: &str) -> String {
    let plan = format!(
        r#"
meta:
  name: "Fixture quakes"
feeds:
  earthquakes: "{}"
  boundaries: "{}"
export:
  profiles:
    - filename: "out/map.html"
      exporter: HTML
    - filename: "out/map.json"
      exporter: JSON
"#,
        fixture("earthquakes.geojson"),
        boundaries
    );
    let path = dir.join("plan.yaml");
    std::fs::write(&path, plan).unwrap();
    path.display().to_string()
}

#[tokio::test]
async fn test_execute_plan_writes_exports() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path(), &fixture("boundaries.geojson"));

    execute_plan(Some(plan), None).await.unwrap();

    let html = std::fs::read_to_string(dir.path().join("out/map.html")).unwrap();
    assert!(html.contains("<title>Fixture quakes</title>"));
    assert!(html.contains("Banda Sea"));
    assert!(html.contains("{ collapsed: false }"));

    let json = std::fs::read_to_string(dir.path().join("out/map.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["earthquakes"]["markers"].as_array().unwrap().len(), 3);
    assert_eq!(value["boundaries"]["features"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_relative_feed_paths_resolve_against_plan() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(
        fixture("boundaries.geojson"),
        dir.path().join("plates.geojson"),
    )
    .unwrap();
    let plan = write_plan(dir.path(), "plates.geojson");

    let (loaded, base_dir) = load_plan(Some(&plan)).unwrap();
    let pipeline = build_pipeline(&loaded, &base_dir).unwrap();
    let map = pipeline.run().await.unwrap();
    assert_eq!(map.boundaries.len(), 2);
}

#[tokio::test]
async fn test_failed_boundary_feed_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path(), "missing-boundaries.geojson");

    let err = execute_plan(Some(plan), None).await.unwrap_err();
    assert!(err.to_string().contains("fetch boundaries"));
    assert!(!dir.path().join("out/map.html").exists());
    assert!(!dir.path().join("out/map.json").exists());
}

#[tokio::test]
async fn test_output_override() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path(), &fixture("boundaries.geojson"));
    let output = dir.path().join("single.json").display().to_string();

    execute_plan(Some(plan), Some(output.clone())).await.unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["title"], "Fixture quakes");
    assert!(!dir.path().join("out/map.html").exists());
}

#[test]
fn test_missing_plan_file() {
    assert!(load_plan(Some("/no/such/plan.yaml")).is_err());
}

#[tokio::test]
async fn test_rendered_is_logged_after_exports() {
    let (logs, _guard) = capture_logs();
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path(), &fixture("boundaries.geojson"));

    execute_plan(Some(plan), None).await.unwrap();

    let logs = logs.contents();
    let last_export = logs.rfind("Starting export").unwrap();
    let rendered = logs.find("Stage: rendered").unwrap();
    assert!(rendered > last_export);
}

#[tokio::test]
async fn test_failed_export_is_not_rendered() {
    let (logs, _guard) = capture_logs();
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path(), &fixture("boundaries.geojson"));
    std::fs::write(dir.path().join("blocker"), "not a directory").unwrap();
    let output = dir.path().join("blocker/map.html").display().to_string();

    let err = execute_plan(Some(plan), Some(output)).await.unwrap_err();
    assert!(err.to_string().contains("1 of 1 exports failed"));

    let logs = logs.contents();
    assert!(logs.contains("Stage: compose map"));
    assert!(!logs.contains("Stage: rendered"));
}
