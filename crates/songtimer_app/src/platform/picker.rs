use std::path::Path;

use songtimer_core::{
    picker::{FilePicker, PickError},
    playback::SelectedFile,
    PickResult,
};

/// Native file dialog filtered to audio extensions.
#[cfg(not(any(target_os = "android", target_os = "ios")))]
pub struct DialogPicker;

#[cfg(not(any(target_os = "android", target_os = "ios")))]
impl FilePicker for DialogPicker {
    fn pick_audio(&mut self) -> Result<PickResult, PickError> {
        let picked = rfd::FileDialog::new()
            .set_title("Select audio file")
            .add_filter("Audio", songtimer_core::playback::AUDIO_EXTENSIONS)
            .pick_file();
        Ok(match picked {
            Some(path) => PickResult::Picked(SelectedFile::from_path(path)),
            None => PickResult::Cancelled,
        })
    }
}

#[cfg(any(target_os = "android", target_os = "ios"))]
pub struct UnsupportedPicker;

#[cfg(any(target_os = "android", target_os = "ios"))]
impl FilePicker for UnsupportedPicker {
    fn pick_audio(&mut self) -> Result<PickResult, PickError> {
        Err(PickError("no document picker on this platform".into()))
    }
}

/// Turns a typed path into a pick result. Blank input counts as a cancelled
/// pick; anything that is not an existing audio file is rejected.
pub fn pick_from_path(input: &str) -> Result<PickResult, PickError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(PickResult::Cancelled);
    }
    let path = Path::new(trimmed);
    if !path.is_file() {
        return Err(PickError(format!("`{}` is not a file", path.display())));
    }
    let file = SelectedFile::from_path(path);
    if !file.is_audio() {
        return Err(PickError(format!("`{}` is not an audio file", file.name)));
    }
    Ok(PickResult::Picked(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn typed_paths_must_point_at_audio_files() {
        let temp = tempdir().expect("tempdir");
        let song = temp.path().join("song.ogg");
        let notes = temp.path().join("notes.txt");
        fs::write(&song, b"OggS").unwrap();
        fs::write(&notes, b"hello").unwrap();

        match pick_from_path(song.to_str().unwrap()).unwrap() {
            PickResult::Picked(file) => {
                assert_eq!(file.name, "song.ogg");
                assert_eq!(file.mime_type, "audio/ogg");
                assert_eq!(file.size, 4);
            }
            PickResult::Cancelled => panic!("expected a pick"),
        }
        assert!(pick_from_path(notes.to_str().unwrap()).is_err());
        assert!(pick_from_path(temp.path().join("missing.mp3").to_str().unwrap()).is_err());
        assert_eq!(pick_from_path("   ").unwrap(), PickResult::Cancelled);
    }
}
