//! Upload boundary — audio file validation and payload loading.
//!
//! Validation runs before any workflow stage change: a rejected file surfaces
//! an inline [`UploadError`] and the workflow stays where it is. The policy
//! matches the upload zone of the app:
//!
//! * the MIME type (guessed from the file extension) must start with `audio/`
//! * the file size must not exceed the configured ceiling (default 10 MB)
//!
//! Folder selection applies the same checks per file, silently dropping
//! invalid entries; an empty result is an error.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

// ---------------------------------------------------------------------------
// UploadError
// ---------------------------------------------------------------------------

/// Validation and IO errors raised at the upload boundary.
///
/// The first two variants carry the exact inline messages shown to the user.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file's MIME type does not indicate audio.
    #[error("Please upload an audio file (MP3, WAV, M4A, etc.)")]
    NotAudio,

    /// The file exceeds the configured size ceiling.
    #[error("File size exceeds {limit_mb}MB limit.")]
    TooLarge { limit_mb: u64 },

    /// A folder was scanned but contained no valid audio file.
    #[error("No valid audio files found in this folder.")]
    NoAudioFiles,

    /// The file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioFile
// ---------------------------------------------------------------------------

/// An uploaded audio file, held in memory for the duration of a session.
///
/// The base64 payload is what the gateway sends to the provider. Audio bytes
/// are never persisted; a reset discards the whole struct.
#[derive(Debug, Clone)]
pub struct AudioFile {
    /// Original location on disk.
    pub path: PathBuf,
    /// File name component (e.g. `meeting.mp3`), recorded into history.
    pub file_name: String,
    /// MIME type guessed from the extension (e.g. `audio/mpeg`).
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Base64-encoded file contents.
    pub base64: String,
}

impl AudioFile {
    /// Validate `path` against the upload policy, then read and encode it.
    ///
    /// `max_bytes` is the size ceiling in bytes (see
    /// [`UploadConfig::max_file_size_bytes`](crate::config::UploadConfig)).
    pub fn load(path: &Path, max_bytes: u64) -> Result<Self, UploadError> {
        let (mime_type, size_bytes) = validate(path, max_bytes)?;

        let bytes = std::fs::read(path).map_err(|e| UploadError::io(path, e))?;
        let base64 = STANDARD.encode(&bytes);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            size_bytes,
            base64,
        })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// MIME type guessed from the file extension.
///
/// Unknown extensions map to `application/octet-stream`, which the audio
/// prefix check then rejects.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Check `path` against the upload policy without reading its contents.
///
/// Returns the guessed MIME type and the file size on success.
pub fn validate(path: &Path, max_bytes: u64) -> Result<(String, u64), UploadError> {
    let metadata = std::fs::metadata(path).map_err(|e| UploadError::io(path, e))?;

    let mime = guess_mime(path);
    if !mime.starts_with("audio/") {
        return Err(UploadError::NotAudio);
    }

    let size = metadata.len();
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            limit_mb: max_bytes / (1024 * 1024),
        });
    }

    Ok((mime, size))
}

// ---------------------------------------------------------------------------
// Folder selection
// ---------------------------------------------------------------------------

/// Scan the top level of `dir` for files that pass the upload policy.
///
/// Invalid entries are dropped silently; subdirectories are not descended
/// into. Returns [`UploadError::NoAudioFiles`] when nothing valid remains.
pub fn scan_folder(dir: &Path, max_bytes: u64) -> Result<Vec<PathBuf>, UploadError> {
    let entries = std::fs::read_dir(dir).map_err(|e| UploadError::io(dir, e))?;

    let mut audio_files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && validate(path, max_bytes).is_ok())
        .collect();

    if audio_files.is_empty() {
        return Err(UploadError::NoAudioFiles);
    }

    audio_files.sort();
    Ok(audio_files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TEN_MB: u64 = 10 * 1024 * 1024;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write test file");
        path
    }

    // ---- guess_mime ---

    #[test]
    fn mp3_maps_to_audio_mpeg() {
        assert_eq!(guess_mime(Path::new("meeting.mp3")), "audio/mpeg");
    }

    #[test]
    fn wav_is_audio() {
        assert!(guess_mime(Path::new("take1.wav")).starts_with("audio/"));
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(
            guess_mime(Path::new("mystery.zzz")),
            "application/octet-stream"
        );
    }

    // ---- validate ---

    #[test]
    fn valid_audio_file_is_accepted() {
        let dir = tempdir().expect("temp dir");
        let path = write_file(dir.path(), "meeting.mp3", b"fake mp3 bytes");

        let (mime, size) = validate(&path, TEN_MB).expect("must accept");
        assert_eq!(mime, "audio/mpeg");
        assert_eq!(size, 14);
    }

    #[test]
    fn non_audio_mime_is_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = write_file(dir.path(), "notes.txt", b"not audio");

        let err = validate(&path, TEN_MB).unwrap_err();
        assert!(matches!(err, UploadError::NotAudio));
        assert!(err.to_string().contains("audio file"));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = write_file(dir.path(), "long.mp3", &[0u8; 64]);

        // Ceiling below the file size.
        let err = validate(&path, 16).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
    }

    #[test]
    fn oversized_message_names_the_limit() {
        let dir = tempdir().expect("temp dir");
        let path = write_file(dir.path(), "long.mp3", &[0u8; 64]);

        let err = validate(&path, 2 * 1024 * 1024).map(|_| ()).err();
        assert!(err.is_none(), "64 bytes fits a 2MB ceiling");

        let err = validate(&path, 0).unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds 0MB limit.");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = validate(Path::new("/no/such/file.mp3"), TEN_MB).unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }

    // ---- AudioFile::load ---

    #[test]
    fn load_encodes_base64_payload() {
        let dir = tempdir().expect("temp dir");
        let path = write_file(dir.path(), "clip.mp3", b"abc");

        let audio = AudioFile::load(&path, TEN_MB).expect("load");
        assert_eq!(audio.file_name, "clip.mp3");
        assert_eq!(audio.mime_type, "audio/mpeg");
        assert_eq!(audio.size_bytes, 3);
        assert_eq!(audio.base64, "YWJj"); // base64("abc")
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempdir().expect("temp dir");
        let path = write_file(dir.path(), "document.pdf", b"%PDF");

        assert!(AudioFile::load(&path, TEN_MB).is_err());
    }

    // ---- scan_folder ---

    #[test]
    fn scan_keeps_only_valid_audio() {
        let dir = tempdir().expect("temp dir");
        write_file(dir.path(), "a.mp3", b"a");
        write_file(dir.path(), "b.wav", b"b");
        write_file(dir.path(), "readme.txt", b"text");
        write_file(dir.path(), "huge.mp3", &[0u8; 128]);

        // Ceiling of 64 bytes drops huge.mp3; readme.txt fails the MIME check.
        let files = scan_folder(dir.path(), 64).expect("scan");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.wav"]);
    }

    #[test]
    fn scan_with_no_valid_files_errors() {
        let dir = tempdir().expect("temp dir");
        write_file(dir.path(), "readme.txt", b"text");

        let err = scan_folder(dir.path(), TEN_MB).unwrap_err();
        assert!(matches!(err, UploadError::NoAudioFiles));
        assert_eq!(
            err.to_string(),
            "No valid audio files found in this folder."
        );
    }

    #[test]
    fn scan_missing_dir_is_io_error() {
        let err = scan_folder(Path::new("/no/such/dir"), TEN_MB).unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }
}
