//! Recording and memo commands

use anyhow::bail;
use chrono::Utc;
use memotree_core::{recording, MemoTreeError, Recording};

use crate::app::App;

/// Catalogue a finished recording captured now; prints its id
pub async fn record(app: &App, uri: &str, name: Option<&str>) -> anyhow::Result<String> {
    let mut recording = Recording::captured(uri, Utc::now());
    if let Some(name) = name {
        recording = recording.with_name(name);
    }
    let id = recording.id.clone();
    let total = app.documents().append_recording(recording).await?.len();
    tracing::info!("Recorded {} ({} in catalogue)", id, total);
    Ok(id)
}

/// One line per recording, newest first: `id<TAB>name<TAB>uri`
pub async fn recordings(app: &App) -> anyhow::Result<String> {
    let mut recordings = app.documents().load_recordings().await?;
    recording::sort_newest_first(&mut recordings);
    Ok(recordings
        .iter()
        .map(|r| format!("{}\t{}\t{}", r.id, r.name, r.uri))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub async fn attach(app: &App, node: &str, recording_id: &str) -> anyhow::Result<String> {
    let recordings = app.documents().load_recordings().await?;
    if recording::find(&recordings, recording_id).is_none() {
        bail!(MemoTreeError::recording_not_found(recording_id));
    }
    app.editor().attach_memo(node, recording_id).await?;
    tracing::info!("Attached {} to {}", recording_id, node);
    Ok(String::new())
}

pub async fn detach(app: &App, node: &str, memo: &str) -> anyhow::Result<String> {
    if !app.editor().detach_memo(node, memo).await? {
        tracing::info!("{} carries no memo {}", node, memo);
    }
    Ok(String::new())
}

pub async fn target(
    app: &App,
    node: &str,
    memo: &str,
    child: Option<&str>,
) -> anyhow::Result<String> {
    app.editor().set_memo_target(node, memo, child).await?;
    match child {
        Some(child) => tracing::info!("Memo {} on {} now leads to {}", memo, node, child),
        None => tracing::info!("Memo {} on {} no longer leads anywhere", memo, node),
    }
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use memotree_core::ROOT_KEY;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_record_and_list_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();

        let first = record(&app, "file:///tmp/a.m4a", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = record(&app, "file:///tmp/b.m4a", Some("Intro")).await.unwrap();

        let listing = recordings(&app).await.unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&second));
        assert!(lines[0].contains("\tIntro\t"));
        assert!(lines[1].starts_with(&first));
    }

    #[tokio::test]
    async fn test_attach_requires_catalogued_recording() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();

        let err = attach(&app, ROOT_KEY, "20240501T123045123Z").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MemoTreeError>(),
            Some(MemoTreeError::RecordingNotFound(_))
        ));

        let id = record(&app, "file:///tmp/a.m4a", None).await.unwrap();
        tokio_test::assert_ok!(attach(&app, ROOT_KEY, &id).await);
        assert!(attach(&app, ROOT_KEY, &id).await.is_err());
    }

    #[tokio::test]
    async fn test_target_and_detach() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();
        let child = app.editor().add_child(Some(ROOT_KEY)).await.unwrap().unwrap();
        let id = record(&app, "file:///tmp/a.m4a", None).await.unwrap();
        attach(&app, ROOT_KEY, &id).await.unwrap();

        target(&app, ROOT_KEY, &id, Some(&child.key)).await.unwrap();
        let snapshot = app.editor().snapshot();
        let memo = snapshot.tree().unwrap().memo(&id).unwrap();
        assert_eq!(memo.connected_node_id.as_deref(), Some(child.key.as_str()));

        detach(&app, ROOT_KEY, &id).await.unwrap();
        assert!(app.editor().snapshot().tree().unwrap().memos.is_empty());
    }
}
