//! Layout and rendering commands

use std::path::Path;

use memotree_core::{layout, GraphEvent, GraphRenderer};
use serde::Serialize;

use crate::app::App;

#[derive(Debug, Serialize)]
struct PlacementView<'a> {
    key: &'a str,
    name: &'a str,
    level: usize,
    index: usize,
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct LayoutView<'a> {
    width: f64,
    height: f64,
    placements: Vec<PlacementView<'a>>,
}

/// Placements of every node, pre-order, as pretty JSON
pub fn layout_json(app: &App) -> anyhow::Result<String> {
    let snapshot = app.editor().snapshot();
    let layout = layout(snapshot.tree(), app.layout());

    let view = LayoutView {
        width: layout.width,
        height: layout.height,
        placements: layout
            .placements
            .iter()
            .map(|p| PlacementView {
                key: &p.node.key,
                name: &p.node.name,
                level: p.level,
                index: p.index,
                x: p.x,
                y: p.y,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Draw the tree as SVG; with `out` the document goes to that file instead
pub async fn render_svg(
    app: &App,
    select: Option<String>,
    out: Option<&Path>,
) -> anyhow::Result<String> {
    let snapshot = app.editor().snapshot();
    if let Some(key) = select.as_deref() {
        if snapshot.find(key).is_none() {
            tracing::warn!("Selected node {} is not in the tree", key);
        }
    }

    let mut renderer = GraphRenderer::new(*app.layout());
    renderer.select(select);
    let frame = renderer.render(snapshot.tree());
    for event in &frame.events {
        if let GraphEvent::RootMoved { x, y } = event {
            tracing::debug!("Root centred at ({}, {})", x, y);
        }
    }

    let svg = frame.to_svg();
    match out {
        Some(path) => {
            tokio::fs::write(path, &svg).await?;
            tracing::info!("Wrote {} nodes to {}", frame.boxes.len(), path.display());
            Ok(String::new())
        }
        None => Ok(svg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memotree_core::ROOT_KEY;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_layout_json_lists_placements() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();
        app.editor().add_child(Some(ROOT_KEY)).await.unwrap();

        let json: serde_json::Value = serde_json::from_str(&layout_json(&app).unwrap()).unwrap();
        assert_eq!(json["width"], 1000.0);
        let placements = json["placements"].as_array().unwrap();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0]["key"], ROOT_KEY);
        assert_eq!(placements[0]["x"], 500.0);
        assert_eq!(placements[1]["level"], 1);
        assert_eq!(placements[1]["name"], "New Node");
    }

    #[tokio::test]
    async fn test_render_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path().join("data").as_path(), None)
            .await
            .unwrap();
        let out = temp_dir.path().join("tree.svg");

        let printed = render_svg(&app, Some(ROOT_KEY.to_string()), Some(&out))
            .await
            .unwrap();
        assert!(printed.is_empty());

        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"data-key="root""#));
        assert!(svg.contains("orange"));
    }

    #[tokio::test]
    async fn test_render_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::open(temp_dir.path(), None).await.unwrap();
        app.editor().delete_node(ROOT_KEY).await.unwrap();

        let svg = render_svg(&app, None, None).await.unwrap();
        assert!(!svg.contains("<rect"));
    }
}
