/// UI building blocks
///
/// - `preview.rs` - the active image with its lineage and download action
/// - `history.rs` - thumbnail grid of the source and every iteration

pub mod history;
pub mod preview;

use std::collections::HashMap;

use iced::widget::image::Handle;

use crate::state::{EncodedImage, IterationStore, NodeRef};

/// Decoded image handles keyed by lineage node
///
/// Handles are created once when an image enters the store, so the renderer
/// can cache textures instead of re-decoding every frame.
#[derive(Debug, Default)]
pub struct ImageHandles {
    handles: HashMap<NodeRef, Handle>,
}

impl ImageHandles {
    pub fn insert(&mut self, node: NodeRef, image: &EncodedImage) {
        self.handles.insert(node, Handle::from_bytes(image.bytes.to_vec()));
    }

    pub fn remove(&mut self, node: &NodeRef) {
        self.handles.remove(node);
    }

    pub fn get(&self, node: &NodeRef) -> Option<&Handle> {
        self.handles.get(node)
    }
}

/// Short display label for a node ("Source", "#3")
pub fn node_label(store: &IterationStore, node: &NodeRef) -> String {
    match node {
        NodeRef::Source => "Source".to_string(),
        NodeRef::Iteration(id) => match store.ordinal(id) {
            Some(n) => format!("#{n}"),
            None => "?".to_string(),
        },
    }
}
