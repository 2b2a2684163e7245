//! Command implementations

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::{ClientConfig, PlaybackClock, DEFAULT_TICK};
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::presenter::ResultView;
use crate::app::session::{lock_session, SessionAction};
use crate::app::timeline::{compute_bands, SegmentBand, TimelineModel, TimelineOverlay};
use crate::cli::args::{OutputFormat, ProcessArgs, TimelineArgs};
use crate::domain::model::{ProcessingParameters, RemovedSegment, UploadState, VideoFile};
use crate::domain::rules::{FieldKind, ParameterKey, PARAMETER_FIELDS};
use crate::error::{EmptyCutError, EmptyCutResult};
use crate::utils::time::{format_percent, format_timestamp};

/// Outcome of one `process` run
#[derive(Debug, Serialize)]
pub struct ProcessReport {
    pub input: PathBuf,
    pub parameters: ProcessingParameters,
    pub state: UploadState,
    pub result: Option<ResultView>,
    pub downloaded_to: Option<PathBuf>,
    /// Why saving the result failed, when it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_error: Option<String>,
    pub removed_segments: Vec<RemovedSegment>,
    pub source_duration: Option<f64>,
    pub timeline: Option<TimelineModel>,
    pub completed_at: DateTime<Utc>,
}

/// Timeline for a known duration and segment list
#[derive(Debug, Serialize)]
pub struct TimelineReport {
    pub duration: f64,
    pub position: f64,
    pub removed_segments: Vec<RemovedSegment>,
    pub timeline: Option<TimelineModel>,
}

/// Execute the process command
pub async fn process(args: ProcessArgs, config: &ClientConfig) -> Result<()> {
    info!("Starting process operation");
    info!("Input: {}", args.input.display());
    info!("Service: {}", config.base_url);

    let container =
        DefaultAppContainer::new(config).context("Failed to set up the processing client")?;
    let download_dir = args.download.clone().or_else(|| config.download_dir.clone());

    let report = execute_process(&container, &args, download_dir.as_deref()).await?;

    if args.play {
        let segments = lock_session(&container.session()).segments.clone();
        play_timeline(&report, segments, &args).await;
    }

    print_report(&report, args.format, args.width)?;

    if let UploadState::Failed(message) = &report.state {
        return Err(EmptyCutError::ProcessingFailed {
            message: message.clone(),
        }
        .into());
    }
    if let Some(message) = &report.download_error {
        return Err(EmptyCutError::DownloadFailed {
            message: message.clone(),
        }
        .into());
    }

    info!("Process operation completed");
    Ok(())
}

/// Drive one submission through the container and collect what it produced
pub async fn execute_process(
    container: &dyn AppContainer,
    args: &ProcessArgs,
    download_dir: Option<&Path>,
) -> EmptyCutResult<ProcessReport> {
    let file = VideoFile::from_path(&args.input).map_err(|_| EmptyCutError::InputFileNotFound {
        path: args.input.display().to_string(),
    })?;

    let session = container.session();
    {
        let mut state = lock_session(&session);
        state.reduce(SessionAction::SelectFile(Some(file)))?;
        let edits = [
            (ParameterKey::MinAreaRatio, &args.min_area),
            (ParameterKey::MaxAreaRatio, &args.max_area),
            (ParameterKey::SkipFrames, &args.skip_frames),
        ];
        for (key, raw) in edits {
            if let Some(raw) = raw {
                state.reduce(SessionAction::EditParameter {
                    key,
                    raw: raw.clone(),
                })?;
            }
        }
    }

    let upload_state = container.upload_interactor().submit(&session).await?;

    let (parameters, result_url, segments, reported_duration) = {
        let state = lock_session(&session);
        (
            state.parameters,
            state.result_url.clone(),
            state.segments.clone(),
            state.source_duration,
        )
    };
    let result = ResultView::present(result_url.as_deref());

    let mut downloaded_to = None;
    let mut download_error = None;
    if let (Some(dir), Some(view), UploadState::Succeeded(_)) = (download_dir, &result, &upload_state) {
        match container.result_presenter().download(view, dir).await {
            Ok(path) => downloaded_to = Some(path),
            Err(e) => {
                warn!("Failed to download the result: {}", e);
                download_error = Some(e.to_string());
            }
        }
    }

    let source_duration = match container.probe_port().probe_duration(&args.input).await {
        Ok(Some(duration)) => Some(duration),
        Ok(None) => reported_duration,
        Err(e) => {
            warn!("Could not probe source duration: {}", e);
            reported_duration
        }
    };

    let timeline = if matches!(upload_state, UploadState::Succeeded(_)) {
        let clock = PlaybackClock::new(source_duration);
        let mut overlay = TimelineOverlay::new();
        overlay.attach(&clock);
        overlay.set_segments(segments.clone());
        overlay.model()
    } else {
        None
    };

    Ok(ProcessReport {
        input: args.input.clone(),
        parameters,
        state: upload_state,
        result,
        downloaded_to,
        download_error,
        removed_segments: segments.to_vec(),
        source_duration,
        timeline,
        completed_at: Utc::now(),
    })
}

async fn play_timeline(report: &ProcessReport, segments: Arc<[RemovedSegment]>, args: &ProcessArgs) {
    if report.timeline.is_none() {
        warn!("Nothing to play: no timeline for this result");
        return;
    }
    let Some(duration) = report.source_duration else {
        return;
    };

    let clock = PlaybackClock::new(Some(duration));
    let mut overlay = TimelineOverlay::new();
    overlay.attach(&clock);
    overlay.set_segments(segments);

    let render = async {
        draw_playhead(&overlay, duration, args.width);
        while let Some(position) = overlay.next_update().await {
            draw_playhead(&overlay, duration, args.width);
            if position.current_time >= duration {
                break;
            }
        }
    };
    tokio::join!(clock.play(DEFAULT_TICK, args.speed), render);
    eprintln!();
    overlay.detach();
}

fn draw_playhead(overlay: &TimelineOverlay, duration: f64, width: usize) {
    if let Some(model) = overlay.model() {
        let mut stderr = std::io::stderr();
        let _ = write!(
            stderr,
            "\r[{}] {} / {}",
            model.render_bar(width),
            format_timestamp(model.progress * duration),
            format_timestamp(duration)
        );
        let _ = stderr.flush();
    }
}

fn print_report(report: &ProcessReport, format: OutputFormat, width: usize) -> EmptyCutResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(report)?),
        OutputFormat::Text => display_process_report(report, width),
    }
    Ok(())
}

fn display_process_report(report: &ProcessReport, width: usize) {
    println!("Input: {}", report.input.display());
    println!(
        "Parameters: min_area_ratio={} max_area_ratio={} skip_frames={}",
        report.parameters.min_area_ratio,
        report.parameters.max_area_ratio,
        report.parameters.skip_frames
    );

    match &report.state {
        UploadState::Failed(message) => println!("Error: {}", message),
        state => println!("Status: {}", state),
    }

    if let Some(view) = &report.result {
        println!();
        println!("=== Result ===");
        println!("Video: {}", view.media_url);
        println!("Download: {} (save as {})", view.download_url, view.suggested_filename);
        if let Some(path) = &report.downloaded_to {
            println!("Saved to: {}", path.display());
        }
        if let Some(message) = &report.download_error {
            println!("Download failed: {}", message);
        }
    }

    if !report.removed_segments.is_empty() {
        println!();
        println!("=== Removed Segments ===");
        let bands = report
            .timeline
            .as_ref()
            .map(|t| t.bands.as_slice())
            .unwrap_or_default();
        print_segments(&report.removed_segments, bands);
    }

    match (&report.timeline, report.source_duration) {
        (Some(model), Some(duration)) => {
            println!();
            println!("Timeline ({}):", format_timestamp(duration));
            println!("[{}]", model.render_bar(width));
        }
        _ if matches!(report.state, UploadState::Succeeded(_)) => {
            println!();
            println!("No timeline: duration unknown");
        }
        _ => {}
    }
}

fn print_segments(segments: &[RemovedSegment], bands: &[SegmentBand]) {
    for (index, segment) in segments.iter().enumerate() {
        let placement = bands
            .get(index)
            .map(|band| {
                format!(
                    " left={} width={}",
                    format_percent(band.left),
                    format_percent(band.width)
                )
            })
            .unwrap_or_default();
        println!(
            "  #{} {} - {}{}",
            index + 1,
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            placement
        );
    }
}

/// Execute the timeline command
pub fn timeline(args: TimelineArgs) -> Result<()> {
    info!("Rendering timeline for {} segments", args.segments.len());

    let segments = args
        .segments
        .iter()
        .map(|spec| RemovedSegment::parse(spec))
        .collect::<Result<Vec<_>, _>>()
        .map_err(EmptyCutError::from)?;

    let timeline = build_timeline(&segments, args.duration, args.position);
    let report = TimelineReport {
        duration: args.duration,
        position: args.position,
        removed_segments: segments,
        timeline,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
        OutputFormat::Text => {
            let bands = report
                .timeline
                .as_ref()
                .map(|t| t.bands.as_slice())
                .unwrap_or_default();
            print_segments(&report.removed_segments, bands);
            match &report.timeline {
                Some(model) => println!("[{}]", model.render_bar(args.width)),
                None => println!("No timeline: duration unknown"),
            }
        }
    }
    Ok(())
}

/// Timeline model for a fixed position, `None` without a positive duration
pub fn build_timeline(segments: &[RemovedSegment], duration: f64, position: f64) -> Option<TimelineModel> {
    if !(duration.is_finite() && duration > 0.0) {
        return None;
    }
    Some(TimelineModel {
        progress: (position / duration).clamp(0.0, 1.0),
        bands: compute_bands(segments, duration),
    })
}

/// Execute the fields command
pub fn fields() -> Result<()> {
    let defaults = ProcessingParameters::default();
    println!(
        "{:<16} {:>8} {:>8} {:>8} {:>6}  {}",
        "FIELD", "DEFAULT", "MIN", "MAX", "STEP", "LABEL"
    );
    for field in &PARAMETER_FIELDS {
        let step = match field.kind {
            FieldKind::Decimal { step } => step.to_string(),
            FieldKind::Integer => "1".to_string(),
        };
        println!(
            "{:<16} {:>8} {:>8} {:>8} {:>6}  {}",
            field.key.form_name(),
            field.display_value(&defaults),
            field.bounds.min,
            field.bounds.max,
            step,
            field.label
        );
    }
    Ok(())
}
