//! Playback: tree walks and single recordings

use memotree_core::{
    recording, AudioBackend, MemoTreeError, Navigation, PlaybackNavigator, Sound,
};
use serde::Serialize;

use crate::app::App;
use crate::audio::LogBackend;

/// Step that returns to the previous node instead of activating a memo
pub const BACK: &str = "-";

#[derive(Debug, Serialize)]
struct Step {
    step: String,
    /// Node the navigator is on after the step
    node: Option<String>,
    moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Walk the tree from the root; prints one JSON record per step.
///
/// A step that fails is recorded in the transcript and the walk continues.
pub async fn play(app: &App, steps: &[String]) -> anyhow::Result<String> {
    let recordings = app.documents().load_recordings().await?;
    let mut navigator =
        PlaybackNavigator::new(LogBackend::default(), app.editor().snapshot(), recordings);

    let mut transcript = Vec::with_capacity(steps.len());
    for step in steps {
        let (moved, error) = if step == BACK {
            (navigator.go_back(), None)
        } else {
            match navigator.activate_memo(step) {
                Ok(Navigation::Moved { .. }) => (true, None),
                Ok(Navigation::Stayed) => (false, None),
                Err(e) => {
                    tracing::warn!("Step {} failed: {}", step, e);
                    (false, Some(e.to_string()))
                }
            }
        };
        transcript.push(Step {
            step: step.clone(),
            node: navigator.current_node().map(|n| n.key.clone()),
            moved,
            error,
        });
    }

    navigator.stop();
    tracing::debug!("Played {} recordings", navigator.backend().played().len());
    Ok(serde_json::to_string_pretty(&transcript)?)
}

/// Play one catalogued recording on its own, outside any tree walk; prints its URI
pub async fn play_recording(app: &App, id: &str) -> anyhow::Result<String> {
    let recordings = app.documents().load_recordings().await?;
    let recording =
        recording::find(&recordings, id).ok_or_else(|| MemoTreeError::recording_not_found(id))?;

    let mut backend = LogBackend::default();
    let mut sound = backend.load(&recording.uri)?;
    let played = sound.play();
    sound.stop_and_unload();
    played?;
    Ok(recording.uri.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{attach, record, target};
    use memotree_core::ROOT_KEY;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_walk_forward_and_back() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();
        let child = app.editor().add_child(Some(ROOT_KEY)).await.unwrap().unwrap();
        let memo = record(&app, "https://example.com/a.m4a", None).await.unwrap();
        attach(&app, ROOT_KEY, &memo).await.unwrap();
        target(&app, ROOT_KEY, &memo, Some(&child.key)).await.unwrap();

        let steps = vec![memo.clone(), BACK.to_string(), BACK.to_string(), "nope".to_string()];
        let json: serde_json::Value =
            serde_json::from_str(&play(&app, &steps).await.unwrap()).unwrap();
        let records = json.as_array().unwrap();

        assert_eq!(records[0]["node"], child.key.as_str());
        assert_eq!(records[0]["moved"], true);
        assert_eq!(records[1]["node"], ROOT_KEY);
        assert_eq!(records[1]["moved"], true);
        assert_eq!(records[2]["moved"], false);
        assert_eq!(records[3]["node"], ROOT_KEY);
        assert!(records[3]["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_play_single_recording() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();
        let id = record(&app, "https://example.com/a.m4a", None).await.unwrap();

        let uri = tokio_test::assert_ok!(play_recording(&app, &id).await);
        assert_eq!(uri, "https://example.com/a.m4a");

        let err = play_recording(&app, "missing").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MemoTreeError>(),
            Some(MemoTreeError::RecordingNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_play_single_recording_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();
        let id = record(&app, "file:///definitely/not/here.m4a", None).await.unwrap();

        let err = play_recording(&app, &id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MemoTreeError>(),
            Some(MemoTreeError::Playback(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_local_file_still_navigates() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();
        let child = app.editor().add_child(Some(ROOT_KEY)).await.unwrap().unwrap();
        let memo = record(&app, "file:///definitely/not/here.m4a", None).await.unwrap();
        attach(&app, ROOT_KEY, &memo).await.unwrap();
        target(&app, ROOT_KEY, &memo, Some(&child.key)).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&play(&app, &[memo]).await.unwrap()).unwrap();
        assert_eq!(json[0]["node"], child.key.as_str());
        assert!(json[0].get("error").is_none());
    }
}
