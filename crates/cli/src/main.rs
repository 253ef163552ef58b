use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use wastesort_core::capture::capture_controller::CaptureController;
use wastesort_core::capture::domain::facing::Facing;
use wastesort_core::capture::infrastructure::image_file_source::{open_image_camera, read_frame};
use wastesort_core::classification::domain::classification_result::ClassificationResult;
use wastesort_core::classification::domain::color_heuristic::ColorHeuristic;
use wastesort_core::classification::domain::image_quality::QualityReport;
use wastesort_core::classification::domain::score_jitter::{MidpointJitter, ScoreJitter};
use wastesort_core::classification::infrastructure::random_jitter::RandomJitter;
use wastesort_core::detection::detection_logger::SummaryDetectionLogger;
use wastesort_core::detection::detection_loop::DetectionLoop;
use wastesort_core::detection::detection_runner::DetectionRunner;
use wastesort_core::detection::infrastructure::threaded_detection_runner::{self, DetectionMessage};
use wastesort_core::scan::domain::scan_record::ScanOutcome;
use wastesort_core::scan::domain::still_image_writer::StillImageWriter;
use wastesort_core::scan::infrastructure::image_file_writer::ImageFileWriter;
use wastesort_core::scan::scan_photo_use_case::ScanPhotoUseCase;
use wastesort_core::shared::clock::SystemClock;
use wastesort_core::shared::scanner_config::ScannerConfig;
use wastesort_core::shared::waste_category::WasteCategory;
use wastesort_core::storage::domain::key_value_store::KeyValueStore;
use wastesort_core::storage::infrastructure::in_memory_store::InMemoryStore;
use wastesort_core::storage::infrastructure::json_file_store::JsonFileStore;
use wastesort_core::storage::scanner_settings::{
    load_scan_history, save_scan_history, ScannerSettings,
};

/// Live waste sorting over a camera simulated from image files.
#[derive(Parser)]
#[command(name = "wastesort")]
struct Cli {
    /// Images or directories played back by the back camera.
    inputs: Vec<PathBuf>,

    /// Images or directories played back by the front camera.
    #[arg(long)]
    front: Vec<PathBuf>,

    /// Camera to open: user (front) or environment (back).
    #[arg(long)]
    facing: Option<Facing>,

    /// Confidence threshold, strictly between 0.0 and 1.0.
    #[arg(long)]
    confidence: Option<f64>,

    /// Stop after this many detection cycles (default: run until Ctrl-C).
    #[arg(long)]
    cycles: Option<usize>,

    /// Milliseconds between detection cycles.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Number of live detections kept in history.
    #[arg(long)]
    history: Option<usize>,

    /// Seed for score jitter.
    #[arg(long)]
    seed: Option<u64>,

    /// Use fixed mid-range jitter so identical frames always score the same.
    #[arg(long)]
    deterministic: bool,

    /// Turn the flash on when the camera opens.
    #[arg(long)]
    flash: bool,

    /// Take one photo, save the enhanced still here and classify it.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Classify an image file as an uploaded photo.
    #[arg(long)]
    upload: Option<PathBuf>,

    /// Print an image quality report for the scanned still.
    #[arg(long)]
    quality: bool,

    /// Print results as JSON lines.
    #[arg(long)]
    json: bool,

    /// Settings and scan history file (default: platform config dir).
    #[arg(long)]
    store: Option<PathBuf>,

    /// Remember facing, confidence, flash, history and interval for later runs.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut store = open_store(&cli)?;
    let settings = apply_flags(ScannerSettings::load(&*store), &cli);
    let config = build_config(&settings, &cli)?;
    if cli.save_settings {
        settings.save(&mut *store)?;
        log::info!("Settings saved");
    }

    let source = open_image_camera(&cli.front, &cli.inputs)?;
    let mut capture =
        CaptureController::new(Box::new(source)).with_preferences(settings.facing, settings.flash);

    if let Some(upload) = &cli.upload {
        let frame = read_frame(upload, 0)?;
        let mut scans = scan_use_case(&cli, &config, &*store);
        let outcome = scans.scan_upload(&mut capture, frame);
        report_scan(&cli, &outcome)?;
        save_scan_history(&mut *store, scans.history())?;
        return Ok(());
    }

    capture
        .start(settings.facing)
        .map_err(|e| e.user_message())?;

    if let Some(snapshot) = &cli.snapshot {
        run_snapshot(&cli, &config, &mut capture, &mut *store, snapshot)
    } else {
        run_live(&cli, &config, capture)
    }
}

fn run_snapshot(
    cli: &Cli,
    config: &ScannerConfig,
    capture: &mut CaptureController,
    store: &mut dyn KeyValueStore,
    snapshot: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut scans = scan_use_case(cli, config, store);
    let outcome = scans.scan_camera(capture).map_err(|e| e.user_message())?;

    ImageFileWriter::new().write(snapshot, outcome.still.frame())?;
    log::info!("Still written to {}", snapshot.display());

    report_scan(cli, &outcome)?;
    save_scan_history(store, scans.history())?;
    Ok(())
}

fn run_live(
    cli: &Cli,
    config: &ScannerConfig,
    capture: CaptureController,
) -> Result<(), Box<dyn std::error::Error>> {
    let classifier = ColorHeuristic::from_config(config, build_jitter(cli));
    let detection = DetectionLoop::new(
        Box::new(classifier),
        Box::new(SystemClock),
        config,
        Box::new(SummaryDetectionLogger::default()),
    );
    let mut runner = DetectionRunner::from_config(config);
    if let Some(n) = cli.cycles {
        runner = runner.with_max_cycles(n);
    }

    let worker = threaded_detection_runner::spawn(capture, detection, runner);
    let stop = worker.stop_handle();
    ctrlc::set_handler(move || stop.request_stop())?;

    for message in worker.messages().iter() {
        match message {
            DetectionMessage::Detected { result, stats, overlay } => {
                if cli.json {
                    println!("{}", serde_json::to_string(&result)?);
                } else {
                    println!(
                        "{}  {}  [{} total, {:.1}/s]",
                        result.timestamp().format("%H:%M:%S%.3f"),
                        overlay.label,
                        stats.total(),
                        stats.rate()
                    );
                }
            }
            DetectionMessage::Cleared => {}
            DetectionMessage::Finished(summary) => {
                log::info!(
                    "{} cycles, {} detections{}",
                    summary.cycles,
                    summary.detections,
                    if summary.stopped_by_request { " (interrupted)" } else { "" }
                );
                break;
            }
        }
    }

    let (_capture, detection) = worker.join()?;
    if !cli.json {
        print_totals(&detection);
    }
    Ok(())
}

fn print_totals(detection: &DetectionLoop) {
    let stats = detection.stats();
    println!("Detections: {}", stats.total());
    for category in WasteCategory::ALL {
        println!("  {:10} {}", category.name(), stats.count(category));
    }
    if !detection.history().is_empty() {
        println!("Recent:");
        for result in detection.history().iter() {
            println!("  {}", result.label());
        }
    }
}

fn report_scan(cli: &Cli, outcome: &ScanOutcome) -> Result<(), Box<dyn std::error::Error>> {
    let quality = cli.quality.then(|| QualityReport::analyze(outcome.still.frame()));

    if cli.json {
        let value = serde_json::json!({
            "captured_at": outcome.captured_at,
            "result": outcome.result,
            "quality": quality,
        });
        println!("{value}");
        return Ok(());
    }

    match &outcome.result {
        Some(result) => print_result(result),
        None => println!("No category above the confidence threshold"),
    }
    if let Some(report) = quality {
        println!(
            "Quality {:.0}/100 (blur {:.1}, brightness {:.1}, contrast {:.1})",
            report.quality_score, report.blur_score, report.brightness, report.contrast
        );
        for line in &report.recommendations {
            println!("  - {line}");
        }
    }
    Ok(())
}

fn print_result(result: &ClassificationResult) {
    let category = result.category();
    println!("{}", result.label());
    println!("  {}", category.description());
}

fn scan_use_case(cli: &Cli, config: &ScannerConfig, store: &dyn KeyValueStore) -> ScanPhotoUseCase {
    let classifier = ColorHeuristic::from_config(config, build_jitter(cli));
    ScanPhotoUseCase::new(Box::new(classifier), Box::new(SystemClock), config)
        .with_history(load_scan_history(store, config.scan_history_cap))
}

fn build_jitter(cli: &Cli) -> Box<dyn ScoreJitter> {
    if cli.deterministic {
        Box::new(MidpointJitter)
    } else if let Some(seed) = cli.seed {
        Box::new(RandomJitter::seeded(seed))
    } else {
        Box::new(RandomJitter::from_entropy())
    }
}

fn open_store(cli: &Cli) -> Result<Box<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    match cli.store.clone().or_else(JsonFileStore::default_path) {
        Some(path) => Ok(Box::new(JsonFileStore::open(path)?)),
        None => {
            log::warn!("No config directory available; settings will not persist");
            Ok(Box::new(InMemoryStore::new()))
        }
    }
}

fn apply_flags(mut settings: ScannerSettings, cli: &Cli) -> ScannerSettings {
    settings.facing = match cli.facing {
        Some(facing) => facing,
        None => available_facing(settings.facing, cli),
    };
    if let Some(confidence) = cli.confidence {
        // Stored as a whole percentage; the exact value is applied in `build_config`.
        settings.confidence = ((confidence * 100.0).round() as u32).clamp(1, 99);
    }
    if let Some(history) = cli.history {
        settings.history_cap = history;
    }
    if let Some(ms) = cli.interval_ms {
        settings.interval_ms = ms;
    }
    settings.flash |= cli.flash;
    settings
}

/// Keeps the preferred facing only when that camera has images to play.
fn available_facing(preferred: Facing, cli: &Cli) -> Facing {
    match (cli.front.is_empty(), cli.inputs.is_empty()) {
        (true, false) => Facing::Environment,
        (false, true) => Facing::User,
        _ => preferred,
    }
}

fn build_config(
    settings: &ScannerSettings,
    cli: &Cli,
) -> Result<ScannerConfig, Box<dyn std::error::Error>> {
    let mut config = settings.to_config()?;
    // Keep the exact flag value rather than the rounded percentage.
    if let Some(confidence) = cli.confidence {
        config.confidence_threshold = confidence;
    }
    if let Some(ms) = cli.interval_ms {
        config.cycle_interval = Duration::from_millis(ms);
    }
    config.validate()?;
    Ok(config)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for path in cli.inputs.iter().chain(&cli.front).chain(&cli.upload) {
        if !path.exists() {
            return Err(format!("Input not found: {}", path.display()).into());
        }
    }
    if cli.upload.is_none() && cli.inputs.is_empty() && cli.front.is_empty() {
        return Err("Provide at least one image or directory to act as a camera".into());
    }
    if cli.upload.is_some() && cli.snapshot.is_some() {
        return Err("--upload and --snapshot are mutually exclusive".into());
    }
    if let Some(c) = cli.confidence {
        if !(c > 0.0 && c < 1.0) {
            return Err(format!("Confidence must be between 0.0 and 1.0 (exclusive), got {c}").into());
        }
    }
    if cli.history == Some(0) {
        return Err("History must keep at least one entry".into());
    }
    if cli.interval_ms == Some(0) {
        return Err("Interval must be at least 1ms".into());
    }
    if cli.seed.is_some() && cli.deterministic {
        return Err("--seed and --deterministic are mutually exclusive".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("wastesort").chain(args.iter().copied()))
    }

    fn config_for(cli: &Cli) -> ScannerConfig {
        build_config(&apply_flags(ScannerSettings::default(), cli), cli).unwrap()
    }

    #[rstest]
    #[case(0.004)]
    #[case(0.005)]
    #[case(0.5)]
    #[case(0.996)]
    #[case(0.999)]
    fn test_edge_confidence_builds_exact_threshold(#[case] confidence: f64) {
        let value = confidence.to_string();
        let cli = parse(&["img.png", "--confidence", &value]);

        let config = config_for(&cli);

        assert_eq!(config.confidence_threshold, confidence);
    }

    #[rstest]
    #[case(0.004, 1)]
    #[case(0.996, 99)]
    #[case(0.42, 42)]
    fn test_saved_confidence_stays_valid(#[case] confidence: f64, #[case] percent: u32) {
        let value = confidence.to_string();
        let cli = parse(&["img.png", "--confidence", &value]);

        let settings = apply_flags(ScannerSettings::default(), &cli);

        assert_eq!(settings.confidence, percent);
        assert!(settings.to_config().is_ok());
    }

    #[rstest]
    #[case(&["--front", "a.png"], Facing::Environment, Facing::User)]
    #[case(&["b.png"], Facing::User, Facing::Environment)]
    #[case(&["b.png", "--front", "a.png"], Facing::User, Facing::User)]
    #[case(&["b.png", "--front", "a.png"], Facing::Environment, Facing::Environment)]
    fn test_default_facing_follows_available_images(
        #[case] args: &[&str],
        #[case] saved: Facing,
        #[case] expected: Facing,
    ) {
        let cli = parse(args);
        let saved = ScannerSettings {
            facing: saved,
            ..ScannerSettings::default()
        };

        assert_eq!(apply_flags(saved, &cli).facing, expected);
    }

    #[test]
    fn test_explicit_facing_is_kept() {
        let cli = parse(&["--front", "a.png", "--facing", "environment"]);

        let settings = apply_flags(ScannerSettings::default(), &cli);

        assert_eq!(settings.facing, Facing::Environment);
    }
}
