use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, VideoError};
use crate::video::assembler::VideoAssembler;
use crate::video::types::VideoParams;
use crate::video::writer::{FfmpegBackend, WriterBackend};

/// Frame rate used for every directory-built video
pub const DIRECTORY_FPS: f64 = 30.0;

/// Build a video from the numbered JPEG stills in `images_dir`
///
/// Stills are ordered by the number before the first `_` in their file name
/// (`1_a.jpg`, `2_b.jpg`, `10_c.jpg`). The video is always written at
/// [`DIRECTORY_FPS`]; the `fps` argument is accepted but not applied.
///
/// Returns the path of the written video, `output_dir/video_file_name`.
pub fn video_from_directory<P, Q>(
    images_dir: P,
    output_dir: Q,
    video_file_name: &str,
    fps: f64,
) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    video_from_directory_with(FfmpegBackend, images_dir, output_dir, video_file_name, fps)
}

pub(crate) fn video_from_directory_with<B, P, Q>(
    backend: B,
    images_dir: P,
    output_dir: Q,
    video_file_name: &str,
    fps: f64,
) -> Result<PathBuf>
where
    B: WriterBackend,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let images_dir = images_dir.as_ref();

    if fps != DIRECTORY_FPS {
        warn!("Requested {} fps ignored, directory videos are written at {} fps", fps, DIRECTORY_FPS);
    }

    let images = sorted_stills(images_dir)?;
    info!("Found {} stills in {:?}", images.len(), images_dir);

    let output_path = output_dir.as_ref().join(video_file_name);
    let params = VideoParams { fps: DIRECTORY_FPS, ..VideoParams::default() };

    VideoAssembler::with_backend(backend, params).assemble(&output_path, &images)?;
    Ok(output_path)
}

/// JPEG files in `dir`, ordered by their numeric file name prefix
pub fn sorted_stills<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut keyed = Vec::new();

    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if !path.is_file() || is_hidden_file(&path) || !is_jpeg(&path) {
            continue;
        }

        let key = sort_key(&path)?;
        keyed.push((key, path));
    }

    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    for (key, path) in &keyed {
        debug!("  {:>8} - {:?}", key, path.file_name().unwrap_or_default());
    }

    Ok(keyed.into_iter().map(|(_, path)| path).collect())
}

/// Number preceding the first `_` in the file name
///
/// A name with no underscore is parsed whole, so `7.jpg` has no valid key.
/// A `nan` prefix is rejected as well: it has no place in a frame order.
pub fn sort_key(path: &Path) -> Result<f64> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let prefix = file_name.split('_').next().unwrap_or(file_name);

    prefix
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|key| !key.is_nan())
        .ok_or_else(|| {
            VideoError::SortKey {
                file_name: file_name.to_string(),
            }
            .into()
        })
}

fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_jpeg(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompositorError;
    use crate::video::writer::recording::RecordingBackend;
    use image::{ImageBuffer, Rgb};
    use tempfile::tempdir;

    fn write_jpeg(dir: &Path, name: &str, shade: u8) {
        let image = ImageBuffer::from_pixel(8, 8, Rgb([shade, shade, shade]));
        image.save(dir.join(name)).unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_sort_key_prefix() {
        assert_eq!(sort_key(Path::new("dir/12_frame.jpg")).unwrap(), 12.0);
        assert_eq!(sort_key(Path::new("2.5_mid_part.jpg")).unwrap(), 2.5);
        assert!(sort_key(Path::new("frame_12.jpg")).is_err());
        assert!(sort_key(Path::new("7.jpg")).is_err());
    }

    #[test]
    fn test_numeric_not_lexicographic_order() {
        let dir = tempdir().unwrap();
        write_jpeg(dir.path(), "2_a.jpg", 10);
        write_jpeg(dir.path(), "10_b.jpg", 20);
        write_jpeg(dir.path(), "1_c.jpg", 30);

        let stills = sorted_stills(dir.path()).unwrap();
        assert_eq!(names(&stills), ["1_c.jpg", "2_a.jpg", "10_b.jpg"]);
    }

    #[test]
    fn test_only_jpegs_are_selected() {
        let dir = tempdir().unwrap();
        write_jpeg(dir.path(), "1_a.jpg", 10);
        write_jpeg(dir.path(), "3_c.JPEG", 10);
        std::fs::write(dir.path().join("2_notes.txt"), "skip me").unwrap();
        std::fs::write(dir.path().join("readme.md"), "no key, not a still").unwrap();

        let stills = sorted_stills(dir.path()).unwrap();
        assert_eq!(names(&stills), ["1_a.jpg", "3_c.JPEG"]);
    }

    #[test]
    fn test_hidden_files_are_skipped() {
        let dir = tempdir().unwrap();
        write_jpeg(dir.path(), "1_a.jpg", 10);
        write_jpeg(dir.path(), "2_b.JPG", 10);
        write_jpeg(dir.path(), ".5_hidden.jpg", 10);
        std::fs::write(dir.path().join("._12_frame.jpg"), b"resource fork").unwrap();

        let stills = sorted_stills(dir.path()).unwrap();
        assert_eq!(names(&stills), ["1_a.jpg", "2_b.JPG"]);
    }

    #[test]
    fn test_nan_prefix_is_rejected() {
        assert!(sort_key(Path::new("nan_frame.jpg")).is_err());
    }

    #[test]
    fn test_bad_prefix_fails_before_assembly() {
        let dir = tempdir().unwrap();
        write_jpeg(dir.path(), "1_a.jpg", 10);
        write_jpeg(dir.path(), "cover_b.jpg", 10);

        let backend = RecordingBackend::default();
        let result = video_from_directory_with(backend.clone(), dir.path(), dir.path(), "out.avi", 30.0);

        match result {
            Err(CompositorError::Video(VideoError::SortKey { file_name })) => {
                assert_eq!(file_name, "cover_b.jpg");
            }
            other => panic!("Expected SortKey error, got {:?}", other),
        }
        assert!(backend.log.borrow().opened.is_empty());
    }

    #[test]
    fn test_directory_video_uses_fixed_rate() {
        let images = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_jpeg(images.path(), "2_a.jpg", 10);
        write_jpeg(images.path(), "1_b.jpg", 200);

        let backend = RecordingBackend::default();
        let path = video_from_directory_with(backend.clone(), images.path(), output.path(), "clip.avi", 12.0)
            .unwrap();

        assert_eq!(path, output.path().join("clip.avi"));

        let log = backend.log.borrow();
        let (opened_path, stream) = &log.opened[0];
        assert_eq!(opened_path, &path);
        assert_eq!(stream.fps, DIRECTORY_FPS);
        assert_eq!(log.frames.len(), 2);
        // 1_b.jpg (bright) comes first
        assert!(log.frames[0].get_pixel(4, 4)[0] > log.frames[1].get_pixel(4, 4)[0]);
    }
}
