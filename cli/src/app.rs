//! Wiring of the document store, tree store and editor for one invocation

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use memotree_core::{DocumentStore, LayoutConfig, TreeEditor, TreeStore};

/// Everything a command needs
pub struct App {
    editor: TreeEditor,
    layout: LayoutConfig,
}

impl App {
    /// Open the data directory, load the tree and the canvas geometry
    pub async fn open(data_dir: &Path, layout_file: Option<&Path>) -> anyhow::Result<Self> {
        let documents = DocumentStore::open(data_dir)
            .await
            .with_context(|| format!("opening data directory {}", data_dir.display()))?;

        let layout = match layout_file {
            Some(path) => load_layout(path).await?,
            None => LayoutConfig::default(),
        };

        let editor = TreeEditor::new(Arc::new(TreeStore::default()), Arc::new(documents));
        editor.load().await.context("loading tree document")?;

        Ok(Self { editor, layout })
    }

    pub fn editor(&self) -> &TreeEditor {
        &self.editor
    }

    pub fn documents(&self) -> &DocumentStore {
        self.editor.documents()
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

async fn load_layout(path: &Path) -> anyhow::Result<LayoutConfig> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading layout file {}", path.display()))?;
    let config: LayoutConfig = serde_json::from_str(&json)
        .with_context(|| format!("parsing layout file {}", path.display()))?;
    tracing::debug!("Layout overrides from {}: {:?}", path.display(), config);
    Ok(config)
}
