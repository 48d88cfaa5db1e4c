use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Deserialize;

use tearmeter_core::calibration::state::CalibrationHandle;
use tearmeter_core::conversion::infrastructure::cpu_yuv420_converter::CpuYuv420Converter;
use tearmeter_core::meniscus::infrastructure::row_projection_detector::{
    DetectorConfig, RowProjectionDetector,
};
use tearmeter_core::pipeline::measure_use_case::MeasureUseCase;
use tearmeter_core::roi::domain::face_geometry::{BoundingBox, FaceGeometry};
use tearmeter_core::roi::domain::meniscus_roi_builder::{MeniscusRoiBuilder, RoiConfig};
use tearmeter_core::shared::yuv_frame::{Plane, YuvFrame};

/// Tear-meniscus height measurement on a still image.
///
/// Stands in for the mobile host: face geometry normally comes from a
/// face detector; here it is supplied on the command line or as JSON.
#[derive(Parser)]
#[command(name = "tearmeter")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Face bounding box as left,top,width,height in image pixels.
    #[arg(long, value_delimiter = ',', num_args = 4, allow_negative_numbers = true)]
    face_box: Option<Vec<f64>>,

    /// Left-eye landmark as x,y in image pixels.
    #[arg(long, value_delimiter = ',', num_args = 2)]
    left_eye: Option<Vec<f64>>,

    /// Right-eye landmark as x,y in image pixels.
    #[arg(long, value_delimiter = ',', num_args = 2)]
    right_eye: Option<Vec<f64>>,

    /// Face geometry as a JSON file (alternative to --face-box).
    #[arg(long, conflicts_with = "face_box")]
    geometry: Option<PathBuf>,

    /// Known reference length in millimeters, for calibration.
    #[arg(long, requires = "calibration_pixels")]
    calibration_mm: Option<f64>,

    /// Observed reference width in pixels, for calibration.
    #[arg(long, requires = "calibration_mm")]
    calibration_pixels: Option<f64>,
}

/// On-disk face geometry, as the hosting app's detector would emit it.
#[derive(Deserialize)]
struct GeometryFile {
    face: [f64; 4],
    #[serde(default)]
    left_eye: Option<[f64; 2]>,
    #[serde(default)]
    right_eye: Option<[f64; 2]>,
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

    let image = image::open(&cli.input)?.to_rgb8();
    let (width, height) = image.dimensions();
    let geometry = build_geometry(&cli, width, height)?;

    let calibration = CalibrationHandle::new();
    if let (Some(mm), Some(px)) = (cli.calibration_mm, cli.calibration_pixels) {
        let state = calibration.calibrate(mm, px)?;
        log::info!("calibrated at {:.3} px/mm", state.pixels_per_mm());
    }

    let use_case = MeasureUseCase::new(
        Box::new(CpuYuv420Converter::new()),
        MeniscusRoiBuilder::new(RoiConfig::default()),
        Box::new(RowProjectionDetector::new(DetectorConfig::default())),
        calibration,
    );

    let frame = encode_yuv420(&image);
    match use_case.execute(&frame, Some(&geometry))? {
        Some(m) => {
            println!("band height: {:.2} px", m.pixel_height);
            let qualifier = if m.calibrated {
                ""
            } else {
                " (uncalibrated estimate)"
            };
            println!("meniscus height: {:.3} mm{qualifier}", m.height_mm);
        }
        None => println!("no measurable eye region in the supplied geometry"),
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if cli.face_box.is_none() && cli.geometry.is_none() {
        return Err("Face geometry is required: pass --face-box or --geometry".into());
    }
    Ok(())
}

fn build_geometry(
    cli: &Cli,
    width: u32,
    height: u32,
) -> Result<FaceGeometry, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.geometry {
        let parsed: GeometryFile = serde_json::from_str(&fs::read_to_string(path)?)?;
        let [left, top, w, h] = parsed.face;
        let mut geometry = FaceGeometry::new(width, height, BoundingBox::new(left, top, w, h));
        geometry.left_eye = parsed.left_eye.map(|[x, y]| (x, y));
        geometry.right_eye = parsed.right_eye.map(|[x, y]| (x, y));
        return Ok(geometry);
    }

    let face_box = cli.face_box.as_ref().expect("validated above");
    let mut geometry = FaceGeometry::new(
        width,
        height,
        BoundingBox::new(face_box[0], face_box[1], face_box[2], face_box[3]),
    );
    geometry.left_eye = cli.left_eye.as_ref().map(|p| (p[0], p[1]));
    geometry.right_eye = cli.right_eye.as_ref().map(|p| (p[0], p[1]));
    Ok(geometry)
}

/// Packs an RGB image into the planar 4:2:0 layout the measurement core
/// consumes, using the inverse of its conversion matrix. Chroma is averaged
/// over each 2x2 block.
fn encode_yuv420(image: &image::RgbImage) -> YuvFrame {
    let (width, height) = image.dimensions();
    let chroma_cols = (width as usize - 1) / 2 + 1;
    let chroma_rows = (height as usize - 1) / 2 + 1;

    let mut luma = vec![0u8; width as usize * height as usize];
    let mut u_sum = vec![0.0f64; chroma_cols * chroma_rows];
    let mut v_sum = vec![0.0f64; chroma_cols * chroma_rows];
    let mut counts = vec![0u32; chroma_cols * chroma_rows];

    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (r, g, b) = (r as f64, g as f64, b as f64);

        let luminance = 0.299 * r + 0.587 * g + 0.114 * b;
        luma[y as usize * width as usize + x as usize] =
            luminance.round().clamp(0.0, 255.0) as u8;

        let chroma_idx = (y as usize / 2) * chroma_cols + x as usize / 2;
        u_sum[chroma_idx] += (b - luminance) / 1.732446 + 128.0;
        v_sum[chroma_idx] += (r - luminance) / 1.370705 + 128.0;
        counts[chroma_idx] += 1;
    }

    let average = |sums: Vec<f64>| -> Vec<u8> {
        sums.iter()
            .zip(&counts)
            .map(|(sum, &n)| (sum / n as f64).round().clamp(0.0, 255.0) as u8)
            .collect()
    };

    YuvFrame::new(
        width,
        height,
        Plane::new(luma, width as usize, 1),
        Plane::new(average(u_sum), chroma_cols, 1),
        Plane::new(average(v_sum), chroma_cols, 1),
        0,
    )
}
