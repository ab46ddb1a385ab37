//! Subcommands
//!
//! Every command returns the text it wants printed; `run` prints it.

mod graph;
mod memos;
mod play;
mod tree;

use std::path::PathBuf;

use clap::Subcommand;

use crate::app::App;

pub use graph::{layout_json, render_svg};
pub use memos::{attach, detach, record, recordings, target};
pub use play::{play, play_recording};
pub use tree::{add, delete, init, rename, show};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace the tree with a single root node
    Init,
    /// Print the tree document
    Show,
    /// Append a placeholder child (does nothing without --parent)
    Add {
        /// Key of the node to add under
        #[arg(long)]
        parent: Option<String>,
    },
    /// Change a node's name
    Rename { key: String, name: String },
    /// Delete a node and its subtree (deleting the root empties the tree)
    Delete { key: String },
    /// Catalogue a finished recording
    Record {
        /// Playable audio locator, e.g. file:///path/to/memo.m4a
        uri: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// List recordings, newest first
    Recordings,
    /// Attach a recording to a node
    Attach { node: String, recording: String },
    /// Detach a memo from a node
    Detach { node: String, memo: String },
    /// Point a memo at the node playback moves to (omit CHILD to clear)
    Target {
        node: String,
        memo: String,
        child: Option<String>,
    },
    /// Print node placements as JSON
    Layout,
    /// Render the tree graph as SVG
    Render {
        /// Highlight this node
        #[arg(long)]
        select: Option<String>,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Play one catalogued recording by id
    PlayRecording { id: String },
    /// Walk the tree from the root: each step is a memo id, or "-" to go back
    Play { steps: Vec<String> },
}

impl Command {
    pub async fn run(self, app: &App) -> anyhow::Result<()> {
        let output = match self {
            Command::Init => init(app).await?,
            Command::Show => show(app)?,
            Command::Add { parent } => add(app, parent.as_deref()).await?,
            Command::Rename { key, name } => rename(app, &key, &name).await?,
            Command::Delete { key } => delete(app, &key).await?,
            Command::Record { uri, name } => record(app, &uri, name.as_deref()).await?,
            Command::Recordings => recordings(app).await?,
            Command::Attach { node, recording } => attach(app, &node, &recording).await?,
            Command::Detach { node, memo } => detach(app, &node, &memo).await?,
            Command::Target { node, memo, child } => {
                target(app, &node, &memo, child.as_deref()).await?
            }
            Command::Layout => layout_json(app)?,
            Command::Render { select, out } => render_svg(app, select, out.as_deref()).await?,
            Command::Play { steps } => play(app, &steps).await?,
            Command::PlayRecording { id } => play_recording(app, &id).await?,
        };

        if !output.is_empty() {
            println!("{}", output);
        }
        Ok(())
    }
}
