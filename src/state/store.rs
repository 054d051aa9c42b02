use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use log::debug;

use super::data::{EncodedImage, Iteration, NodeRef};
use crate::error::StoreError;

/// The IterationStore holds the image lineage for the current session.
///
/// It keeps the optional source image, every generated iteration (indexed by
/// id, ordered newest first) and the active selection. Nothing is persisted:
/// the store lives as long as the window does.
///
/// Invariant: an active `NodeRef::Iteration` always names an iteration that
/// exists in the store, and an active `NodeRef::Source` implies a source image.
#[derive(Debug, Default)]
pub struct IterationStore {
    source: Option<EncodedImage>,
    iterations: HashMap<String, Iteration>,
    /// Iteration ids, newest first
    order: VecDeque<String>,
    active: Option<NodeRef>,
}

impl IterationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the source image and make it the active selection
    pub fn set_source(&mut self, image: EncodedImage) {
        debug!("Source image set ({}, {} bytes)", image.mime_type, image.byte_len());
        self.source = Some(image);
        self.active = Some(NodeRef::Source);
    }

    /// Remove the source image
    ///
    /// Iterations are kept, even those whose root was the source. If the
    /// source was active, the newest iteration (or nothing) becomes active.
    pub fn clear_source(&mut self) {
        self.source = None;
        if self.active == Some(NodeRef::Source) {
            self.active = self.newest().map(|iteration| NodeRef::Iteration(iteration.id.clone()));
        }
    }

    /// Record a successful generation and make it active
    ///
    /// `parent` is the base the generation ran against. Prompt emptiness is
    /// the caller's concern.
    pub fn add_iteration(
        &mut self,
        prompt: impl Into<String>,
        image: EncodedImage,
        parent: Option<NodeRef>,
    ) -> &Iteration {
        let id = uuid::Uuid::new_v4().to_string();
        let iteration = Iteration {
            id: id.clone(),
            image,
            prompt: prompt.into(),
            timestamp: Utc::now().timestamp_millis(),
            parent,
        };

        debug!("Iteration {} added (parent: {:?})", id, iteration.parent);

        self.order.push_front(id.clone());
        self.active = Some(NodeRef::Iteration(id.clone()));
        self.iterations.entry(id).or_insert(iteration)
    }

    /// Change the active selection
    ///
    /// Unknown iteration ids, and `Source` while no source is loaded, are
    /// rejected and leave the selection untouched.
    pub fn set_active(&mut self, selection: NodeRef) -> Result<(), StoreError> {
        match &selection {
            NodeRef::Source if self.source.is_none() => return Err(StoreError::NoSource),
            NodeRef::Iteration(id) if !self.iterations.contains_key(id) => {
                return Err(StoreError::UnknownIteration(id.clone()));
            }
            _ => {}
        }
        self.active = Some(selection);
        Ok(())
    }

    /// The image currently shown
    ///
    /// Falls back to the source image when nothing (or an unknown iteration)
    /// is selected. `None` means there is nothing to display.
    pub fn resolve_active_image(&self) -> Option<&EncodedImage> {
        self.resolve_active().map(|(_, image)| image)
    }

    /// The image currently shown together with the node it belongs to
    ///
    /// This is the base for the next generation.
    pub fn resolve_active(&self) -> Option<(NodeRef, &EncodedImage)> {
        if let Some(NodeRef::Iteration(id)) = &self.active {
            if let Some(iteration) = self.iterations.get(id) {
                return Some((NodeRef::Iteration(id.clone()), &iteration.image));
            }
        }
        self.source.as_ref().map(|image| (NodeRef::Source, image))
    }

    pub fn active(&self) -> Option<&NodeRef> {
        self.active.as_ref()
    }

    pub fn source(&self) -> Option<&EncodedImage> {
        self.source.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&Iteration> {
        self.iterations.get(id)
    }

    /// All iterations, newest first
    pub fn iterations(&self) -> impl Iterator<Item = &Iteration> + '_ {
        self.order.iter().filter_map(|id| self.iterations.get(id))
    }

    pub fn newest(&self) -> Option<&Iteration> {
        self.order.front().and_then(|id| self.iterations.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 1-based creation number of an iteration (the first generation is #1)
    pub fn ordinal(&self, id: &str) -> Option<usize> {
        self.order
            .iter()
            .position(|candidate| candidate == id)
            .map(|index| self.order.len() - index)
    }

    /// Ancestry of an iteration, root first and the iteration itself last
    ///
    /// The walk stops at the source, at a parent-less iteration, or at a
    /// parent that no longer resolves. Parents always predate their children,
    /// so the walk terminates.
    pub fn lineage(&self, id: &str) -> Vec<NodeRef> {
        let mut chain = Vec::new();
        let mut cursor = self.iterations.get(id);

        while let Some(iteration) = cursor {
            chain.push(NodeRef::Iteration(iteration.id.clone()));
            cursor = match &iteration.parent {
                Some(NodeRef::Iteration(parent_id)) => self.iterations.get(parent_id),
                Some(NodeRef::Source) => {
                    chain.push(NodeRef::Source);
                    None
                }
                None => None,
            };
        }

        chain.reverse();
        chain
    }
}
