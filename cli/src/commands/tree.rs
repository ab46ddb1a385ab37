//! Tree structure commands

use anyhow::Context;

use crate::app::App;

pub async fn init(app: &App) -> anyhow::Result<String> {
    let snapshot = app.editor().initialize_root().await?;
    tracing::info!("Tree reset to root (revision {})", snapshot.revision);
    Ok(serde_json::to_string_pretty(&snapshot.tree())?)
}

pub fn show(app: &App) -> anyhow::Result<String> {
    let snapshot = app.editor().snapshot();
    serde_json::to_string_pretty(&snapshot.tree()).context("serializing tree")
}

pub async fn add(app: &App, parent: Option<&str>) -> anyhow::Result<String> {
    match app.editor().add_child(parent).await? {
        Some(child) => {
            tracing::info!("Added {} under {}", child.key, parent.unwrap_or_default());
            Ok(child.key)
        }
        None => {
            tracing::info!("No parent given, nothing added");
            Ok(String::new())
        }
    }
}

pub async fn rename(app: &App, key: &str, name: &str) -> anyhow::Result<String> {
    if !app.editor().rename_node(key, name).await? {
        tracing::info!("Nothing renamed: {} not found or already named {:?}", key, name);
    }
    Ok(String::new())
}

pub async fn delete(app: &App, key: &str) -> anyhow::Result<String> {
    if app.editor().delete_node(key).await? {
        tracing::info!("Deleted {}", key);
    } else {
        tracing::info!("{} not in tree", key);
    }
    Ok(String::new())
}
