//! Sound cue playback
//!
//! Every cue is decoded once at startup. Cues whose file is missing or
//! undecodable are left out of the cache and simply stay silent.

use crate::game::Cue;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn filename(cue: Cue) -> String {
    format!("{}.wav", cue.name())
}

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    volume: f32,
    cache: HashMap<Cue, Arc<[u8]>>,
}

impl AudioManager {
    /// Open the default output device and load the cue files
    ///
    /// Returns None when there is no usable output device.
    pub fn new(volume: f32) -> Option<Self> {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "no audio output device, running silent");
                return None;
            }
        };

        let cache = match Self::find_assets_path() {
            Some(dir) => load_cues(&dir),
            None => {
                tracing::warn!("sound assets not found, running silent");
                HashMap::new()
            }
        };

        Some(Self {
            _stream: stream,
            stream_handle,
            volume: volume.clamp(0.0, 1.0),
            cache,
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let mut paths = vec![PathBuf::from("assets")];
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            paths.push(dir.join("assets"));
        }

        paths.into_iter().find(|p| p.join("sounds").is_dir())
    }

    /// Play a cue. Unknown cues play nothing.
    pub fn play(&self, cue: Cue) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(bytes) = self.cache.get(&cue) else {
            return;
        };
        let Ok(decoder) = Decoder::new(Cursor::new(Arc::clone(bytes))) else {
            return;
        };
        if let Ok(sink) = Sink::try_new(&self.stream_handle) {
            sink.set_volume(self.volume);
            sink.append(decoder);
            sink.detach(); // Let it play and clean up automatically
        }
    }

    /// Play every cue in order
    pub fn play_all(&self, cues: &[Cue]) {
        for &cue in cues {
            self.play(cue);
        }
    }
}

/// Read and validate each cue file under `<assets>/sounds`
fn load_cues(assets: &Path) -> HashMap<Cue, Arc<[u8]>> {
    let dir = assets.join("sounds");
    let mut cache = HashMap::new();

    for &cue in Cue::all() {
        let path = dir.join(filename(cue));
        let bytes: Arc<[u8]> = match fs::read(&path) {
            Ok(bytes) => bytes.into(),
            Err(e) => {
                tracing::warn!(cue = cue.name(), path = %path.display(), error = %e, "missing sound cue");
                continue;
            }
        };
        if let Err(e) = Decoder::new(Cursor::new(Arc::clone(&bytes))) {
            tracing::warn!(cue = cue.name(), error = %e, "undecodable sound cue");
            continue;
        }
        cache.insert(cue, bytes);
    }

    tracing::info!(loaded = cache.len(), total = Cue::all().len(), "sound cues loaded");
    cache
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_filenames() {
        assert_eq!(filename(Cue::Move), "move.wav");
        assert_eq!(filename(Cue::GameOver), "gameover.wav");
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let dir = std::env::temp_dir().join(format!("combotris-no-assets-{}", std::process::id()));
        assert!(load_cues(&dir).is_empty());
    }

    #[test]
    fn test_garbage_file_is_skipped() {
        let dir = std::env::temp_dir().join(format!("combotris-bad-assets-{}", std::process::id()));
        fs::create_dir_all(dir.join("sounds")).unwrap();
        fs::write(dir.join("sounds").join("move.wav"), b"definitely not audio").unwrap();
        assert!(load_cues(&dir).is_empty());
        let _ = fs::remove_dir_all(&dir);
    }
}
