// End-to-end viewer scenarios: real image files on disk, recording display sink.
use std::path::{Path, PathBuf};

use fbview::image_pipeline::{
    DecodedImage, DisplayRequest, DisplaySink, Offset, ResizeStrategy, Rotation, RunSummary,
    ScreenSize, StretchMode, ViewError, Viewer, ViewerConfig, prepare_surface,
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};

struct Frame {
    width: u32,
    height: u32,
    offset: Offset,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

struct RecordingSink {
    screen: ScreenSize,
    frames: Vec<Frame>,
}

impl RecordingSink {
    fn new(width: u32, height: u32) -> Self {
        Self {
            screen: ScreenSize::new(width, height),
            frames: Vec::new(),
        }
    }
}

impl DisplaySink for RecordingSink {
    fn resolution(&mut self) -> Result<ScreenSize, ViewError> {
        Ok(self.screen)
    }

    fn display(&mut self, request: &DisplayRequest<'_>) -> Result<(), ViewError> {
        self.frames.push(Frame {
            width: request.width,
            height: request.height,
            offset: request.offset,
            rgb: request.rgb.to_vec(),
            alpha: request.alpha.map(<[u8]>::to_vec),
        });
        Ok(())
    }
}

struct TempImage(PathBuf);

impl TempImage {
    fn png_rgb(name: &str, width: u32, height: u32) -> Self {
        let path = temp_path(name);
        let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 42]));
        DynamicImage::ImageRgb8(img)
            .save_with_format(&path, ImageFormat::Png)
            .expect("failed to encode test png");
        Self(path)
    }

    fn png_rgba(name: &str, width: u32, height: u32) -> Self {
        let path = temp_path(name);
        let img = ImageBuffer::from_fn(width, height, |x, _| Rgba([10, 20, 30, (x * 50) as u8]));
        DynamicImage::ImageRgba8(img)
            .save_with_format(&path, ImageFormat::Png)
            .expect("failed to encode test png");
        Self(path)
    }

    fn jpeg(name: &str, width: u32, height: u32) -> Self {
        let path = temp_path(name);
        let img = ImageBuffer::from_pixel(width, height, Rgb([128u8, 128, 128]));
        DynamicImage::ImageRgb8(img)
            .save_with_format(&path, ImageFormat::Jpeg)
            .expect("failed to encode test jpeg");
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fbview-scenario-{}-{}", std::process::id(), name))
}

fn quiet(config: ViewerConfig) -> ViewerConfig {
    ViewerConfig {
        clear: false,
        ..config
    }
}

#[test]
fn oversized_image_without_scaling_is_shown_at_origin() {
    let image = TempImage::png_rgb("wide.png", 300, 100);
    let mut viewer = Viewer::new(quiet(ViewerConfig::default()), RecordingSink::new(200, 100), Vec::<u8>::new());

    let shown = viewer.show_image(image.path()).expect("show");

    assert_eq!(shown.decoder, "PNG");
    assert_eq!((shown.width, shown.height), (300, 100));
    assert_eq!(shown.offset, Offset { x: 0, y: 0 });
    assert!(!shown.transformed);
}

#[test]
fn fit_is_noop_for_image_that_already_fits() {
    let image = TempImage::png_rgb("small.png", 100, 50);
    let config = quiet(ViewerConfig {
        stretch: StretchMode::Simple,
        ..Default::default()
    });
    let mut viewer = Viewer::new(config, RecordingSink::new(200, 100), Vec::<u8>::new());

    let shown = viewer.show_image(image.path()).expect("show");

    assert_eq!((shown.width, shown.height), (100, 50));
    assert_eq!(shown.offset, Offset { x: 50, y: 25 });
    assert!(!shown.transformed);
}

#[test]
fn enlarge_fills_screen_width_when_aspect_allows() {
    let image = TempImage::png_rgb("half.png", 100, 50);
    let config = quiet(ViewerConfig {
        stretch: StretchMode::Simple,
        enlarge: true,
        ..Default::default()
    });
    let mut viewer = Viewer::new(config, RecordingSink::new(200, 100), Vec::<u8>::new());

    let shown = viewer.show_image(image.path()).expect("show");

    assert_eq!((shown.width, shown.height), (200, 100));
    assert_eq!(shown.offset, Offset { x: 0, y: 0 });
    assert!(shown.transformed);
}

#[test]
fn enlarge_square_keeps_aspect_and_centers() {
    let image = TempImage::png_rgb("square.png", 50, 50);
    let config = quiet(ViewerConfig {
        enlarge: true,
        ..Default::default()
    });
    let mut viewer = Viewer::new(config, RecordingSink::new(200, 100), Vec::<u8>::new());

    let shown = viewer.show_image(image.path()).expect("show");

    assert_eq!((shown.width, shown.height), (100, 100));
    assert_eq!(shown.offset, Offset { x: 50, y: 0 });
}

#[test]
fn color_stretch_shrinks_jpeg_to_screen() {
    let image = TempImage::jpeg("photo.jpg", 640, 480);
    let config = quiet(ViewerConfig {
        stretch: StretchMode::ColorAverage,
        ..Default::default()
    });
    let mut viewer = Viewer::new(config, RecordingSink::new(320, 200), Vec::<u8>::new());

    let shown = viewer.show_image(image.path()).expect("show");

    assert_eq!(shown.decoder, "JPEG");
    // 按宽度：480*320/640 = 240 > 200，改按高度：640*200/480 = 266
    assert_eq!((shown.width, shown.height), (266, 200));
    assert_eq!(shown.offset, Offset { x: 27, y: 0 });
}

#[test]
fn rotated_alpha_image_is_forwarded_with_mask() {
    let image = TempImage::png_rgba("mask.png", 4, 2);
    let config = quiet(ViewerConfig {
        alpha: true,
        rotation: Rotation::Cw90,
        ..Default::default()
    });
    let mut viewer = Viewer::new(config, RecordingSink::new(10, 10), Vec::<u8>::new());

    viewer.show_image(image.path()).expect("show");

    let frame = &viewer.sink().frames[0];
    assert_eq!((frame.width, frame.height), (2, 4));
    assert_eq!(frame.offset, Offset { x: 4, y: 3 });
    assert_eq!(frame.rgb.len(), 2 * 4 * 3);
    // 顺时针 90° 后，第 k 行来自原图第 k 列：alpha = k * 50
    assert_eq!(
        frame.alpha.as_deref(),
        Some(&[0, 0, 50, 50, 100, 100, 150, 150][..])
    );
}

#[test]
fn failed_images_do_not_affect_later_ones() {
    let good = TempImage::png_rgb("good.png", 8, 8);
    let bogus = temp_path("bogus.png");
    std::fs::write(&bogus, b"definitely not a png").expect("write");
    let missing = temp_path("missing.png");

    let mut viewer = Viewer::new(quiet(ViewerConfig::default()), RecordingSink::new(16, 16), Vec::<u8>::new());
    let paths = [bogus.clone(), missing, good.path().to_path_buf()];
    let summary = viewer.run(&paths).expect("run");

    assert_eq!(summary, RunSummary { shown: 1, failed: 2 });
    assert_eq!(viewer.sink().frames.len(), 1);
    assert_eq!(viewer.sink().frames[0].offset, Offset { x: 4, y: 4 });

    let _ = std::fs::remove_file(&bogus);
}

#[test]
fn clear_sequence_surrounds_each_display() {
    let image = TempImage::png_rgb("clear.png", 2, 2);
    let mut viewer = Viewer::new(ViewerConfig::default(), RecordingSink::new(4, 4), Vec::<u8>::new());

    viewer.show_image(image.path()).expect("show");

    assert_eq!(viewer.console().as_slice(), b"\x1b[H\x1b[J\x1b[H\x1b[J");
}

#[test]
fn decoder_buffers_survive_pipeline() {
    let decoded = DecodedImage {
        width: 10,
        height: 20,
        rgb: (0..600).map(|i| (i % 256) as u8).collect(),
        alpha: Some(vec![77; 200]),
    };
    let original = decoded.clone();

    let surface = prepare_surface(
        &decoded,
        ScreenSize::new(5, 5),
        Rotation::Cw90,
        Some(ResizeStrategy::ColorAverage),
        true,
    )
    .expect("prepare");
    assert!(surface.is_owned());
    assert!(surface.width() <= 5 && surface.height() <= 5);
    surface.release();

    assert_eq!(decoded, original);
}
