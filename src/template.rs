//! Device frame template lookup and loading.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, info};

use crate::error::MockupError;
use crate::geometry::ScreenGeometry;

/// File name of the bundled frame template.
pub const TEMPLATE_FILE_NAME: &str = "phone_mockup.png";

/// Build the ordered list of template locations.
///
/// 1. The configured path (from `--template` or the config file), if any
/// 2. `phone_mockup.png` next to the running executable (packaged install)
/// 3. `phone_mockup.png` in the current working directory (ad-hoc run)
#[must_use]
pub fn template_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(path) = configured {
        candidates.push(path.to_path_buf());
    }
    let exe = std::env::current_exe().ok();
    if let Some(dir) = exe.as_deref().and_then(Path::parent) {
        candidates.push(dir.join(TEMPLATE_FILE_NAME));
    }
    candidates.push(PathBuf::from(TEMPLATE_FILE_NAME));
    candidates.dedup();
    candidates
}

/// Load the first readable template among `candidates`, converted to RGBA.
///
/// # Errors
///
/// Returns [`MockupError::TemplateMissing`] if no candidate exists and decodes,
/// or [`MockupError::TemplateSize`] if the template does not match the phone
/// dimensions of `geometry`.
pub fn load_template(
    candidates: &[PathBuf],
    geometry: &ScreenGeometry,
) -> Result<RgbaImage, MockupError> {
    for path in candidates {
        if !path.is_file() {
            debug!(path = %path.display(), "template candidate absent");
            continue;
        }
        let img = match image::open(path) {
            Ok(img) => img,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "template candidate unreadable");
                continue;
            }
        };

        let template = img.to_rgba8();
        let (width, height) = template.dimensions();
        if (width, height) != (geometry.phone_width, geometry.phone_height) {
            return Err(MockupError::TemplateSize {
                path: path.clone(),
                expected_width: geometry.phone_width,
                expected_height: geometry.phone_height,
                actual_width: width,
                actual_height: height,
            });
        }

        info!(path = %path.display(), width, height, "template loaded");
        return Ok(template);
    }

    Err(MockupError::TemplateMissing {
        tried: candidates.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([9, 9, 9]));
        img.save_with_format(path, image::ImageFormat::Png).unwrap();
    }

    fn small_geometry() -> ScreenGeometry {
        ScreenGeometry {
            phone_width: 12,
            phone_height: 24,
            screen_width: 10,
            screen_height: 20,
        }
    }

    #[test]
    fn candidates_start_with_configured_and_end_with_cwd() {
        let c = template_candidates(Some(Path::new("/opt/mockup/frame.png")));
        assert_eq!(c.first(), Some(&PathBuf::from("/opt/mockup/frame.png")));
        assert_eq!(c.last(), Some(&PathBuf::from(TEMPLATE_FILE_NAME)));
    }

    #[test]
    fn candidates_without_configured_path() {
        let c = template_candidates(None);
        assert!(!c.is_empty());
        assert_eq!(c.last(), Some(&PathBuf::from(TEMPLATE_FILE_NAME)));
    }

    #[test]
    fn missing_everywhere_is_template_missing() {
        let tried = vec![
            PathBuf::from("/nonexistent/a/phone_mockup.png"),
            PathBuf::from("/nonexistent/b/phone_mockup.png"),
        ];
        match load_template(&tried, &small_geometry()) {
            Err(MockupError::TemplateMissing { tried: t }) => assert_eq!(t, tried),
            other => panic!("expected TemplateMissing, got {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_second_candidate_and_converts_to_rgba() {
        let dir = std::env::temp_dir().join("mockup_template_fallback_test");
        std::fs::create_dir_all(&dir).unwrap();
        let fallback = dir.join("phone_mockup.png");
        write_png(&fallback, 12, 24);

        let candidates = vec![dir.join("missing.png"), fallback];
        let template = load_template(&candidates, &small_geometry()).unwrap();
        assert_eq!(template.dimensions(), (12, 24));
        assert_eq!(*template.get_pixel(0, 0), image::Rgba([9, 9, 9, 255]));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn undecodable_candidate_is_skipped() {
        let dir = std::env::temp_dir().join("mockup_template_garbage_test");
        std::fs::create_dir_all(&dir).unwrap();
        let garbage = dir.join("garbage.png");
        std::fs::write(&garbage, b"not a png").unwrap();
        let good = dir.join("good.png");
        write_png(&good, 12, 24);

        let template = load_template(&[garbage, good], &small_geometry()).unwrap();
        assert_eq!(template.dimensions(), (12, 24));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn wrong_size_is_rejected() {
        let dir = std::env::temp_dir().join("mockup_template_size_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("phone_mockup.png");
        write_png(&path, 10, 10);

        let err = load_template(&[path], &small_geometry()).unwrap_err();
        assert!(matches!(
            err,
            MockupError::TemplateSize {
                actual_width: 10,
                ..
            }
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
