//! Landmark recordings: a JSON array of timestamped frames.

use anyhow::Context;
use log::warn;
use squatcore::pose::TimedFrame;
use std::fs;
use std::path::Path;

pub fn load_recording<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<TimedFrame>> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading recording {}", path_ref.display()))?;
    let frames: Vec<TimedFrame> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing recording {}", path_ref.display()))?;

    if let Some(position) = frames
        .windows(2)
        .position(|pair| pair[1].timestamp_ms < pair[0].timestamp_ms)
    {
        warn!(
            "recording {} goes back in time at frame {}; replaying in file order",
            path_ref.display(),
            position + 1
        );
    }
    Ok(frames)
}

pub fn save_recording<P: AsRef<Path>>(path: P, frames: &[TimedFrame]) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string(frames).context("serializing recording")?;
    fs::write(path_ref, contents)
        .with_context(|| format!("writing recording {}", path_ref.display()))?;
    Ok(())
}
