/// Editor session: the iteration store plus the generation lifecycle
///
/// The UI drives generations through `begin_generation` / `finish_generation`.
/// Keeping this out of the iced application makes the whole request flow
/// testable without a window or a network.

use log::{info, warn};

use super::data::{EncodedImage, Iteration, NodeRef};
use super::store::IterationStore;
use crate::error::GenerationError;

/// Everything the generation client needs for one request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationJob {
    pub prompt: String,
    pub base_image: Option<EncodedImage>,
}

/// Snapshot taken when a request starts, applied when it completes
#[derive(Debug, Clone, PartialEq)]
struct PendingGeneration {
    prompt: String,
    base: Option<NodeRef>,
}

#[derive(Debug, Default)]
pub struct EditorSession {
    store: IterationStore,
    prompt: String,
    pending: Option<PendingGeneration>,
    /// Last user-facing error, cleared by the next attempt
    error: Option<String>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &IterationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut IterationStore {
        &mut self.store
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Validate the prompt and snapshot the base for a new request
    ///
    /// On error the store is untouched and no request must be sent.
    pub fn begin_generation(&mut self) -> Result<GenerationJob, GenerationError> {
        if self.is_generating() {
            return Err(GenerationError::Busy);
        }

        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            let err = GenerationError::EmptyPrompt;
            self.error = Some(err.to_string());
            return Err(err);
        }

        let (base, base_image) = match self.store.resolve_active() {
            Some((node, image)) => (Some(node), Some(image.clone())),
            None => (None, None),
        };

        let job = GenerationJob {
            prompt: prompt.to_string(),
            base_image,
        };

        info!("🎨 Generating from {:?}: {:?}", base, job.prompt);

        self.pending = Some(PendingGeneration {
            prompt: job.prompt.clone(),
            base,
        });
        self.error = None;

        Ok(job)
    }

    /// Apply the outcome of the outstanding request
    ///
    /// The generating state is always cleared. The store only changes on
    /// success; failures become the session error. Results with no request
    /// outstanding are dropped.
    pub fn finish_generation(
        &mut self,
        result: Result<EncodedImage, GenerationError>,
    ) -> Option<&Iteration> {
        let Some(pending) = self.pending.take() else {
            warn!("Dropping a generation result with no request outstanding");
            return None;
        };

        match result {
            Ok(image) => {
                self.error = None;
                let iteration = self.store.add_iteration(pending.prompt, image, pending.base);
                info!("✅ Generated iteration {}", iteration.id);
                Some(iteration)
            }
            Err(err) => {
                warn!("Generation failed: {}", err);
                self.error = Some(err.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(tag: u8) -> EncodedImage {
        EncodedImage::new("image/png", vec![tag; 8])
    }

    #[test]
    fn test_empty_prompt_is_rejected() {
        let mut session = EditorSession::new();
        session.store_mut().set_source(image(0));

        for prompt in ["", "   ", "\n\t"] {
            session.set_prompt(prompt);
            assert_eq!(session.begin_generation(), Err(GenerationError::EmptyPrompt));
            assert!(!session.is_generating());
            assert_eq!(session.error(), Some("Please enter a prompt describing the edit."));
        }

        assert!(session.store().is_empty());
        assert_eq!(session.store().active(), Some(&NodeRef::Source));
    }

    #[test]
    fn test_second_request_is_busy() {
        let mut session = EditorSession::new();
        session.set_prompt("Add plants");
        session.begin_generation().unwrap();

        assert!(session.is_generating());
        assert_eq!(session.begin_generation(), Err(GenerationError::Busy));
    }

    #[test]
    fn test_job_carries_trimmed_prompt_and_active_image() {
        let mut session = EditorSession::new();
        session.store_mut().set_source(image(7));
        session.set_prompt("  Add plants  ");

        let job = session.begin_generation().unwrap();
        assert_eq!(job.prompt, "Add plants");
        assert_eq!(job.base_image, Some(image(7)));
    }

    #[test]
    fn test_text_only_generation_has_no_parent() {
        let mut session = EditorSession::new();
        session.set_prompt("A lighthouse at dusk");

        let job = session.begin_generation().unwrap();
        assert_eq!(job.base_image, None);

        let iteration = session.finish_generation(Ok(image(1))).unwrap();
        assert_eq!(iteration.parent, None);
    }

    #[test]
    fn test_failure_clears_generating_and_keeps_store() {
        let mut session = EditorSession::new();
        session.store_mut().set_source(image(0));
        session.set_prompt("Add plants");
        session.begin_generation().unwrap();

        let outcome = session.finish_generation(Err(GenerationError::NoCandidates));

        assert!(outcome.is_none());
        assert!(!session.is_generating());
        assert!(session.store().is_empty());
        assert_eq!(session.store().active(), Some(&NodeRef::Source));
        assert_eq!(session.error(), Some("The model returned no candidates."));

        // Retry is possible and clears the error
        session.begin_generation().unwrap();
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_stray_result_is_ignored() {
        let mut session = EditorSession::new();
        assert!(session.finish_generation(Ok(image(1))).is_none());
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_two_step_edit_scenario() {
        let mut session = EditorSession::new();
        let a = image(0xA);
        let b = image(0xB);
        let c = image(0xC);

        session.store_mut().set_source(a.clone());

        session.set_prompt("Add plants");
        let job = session.begin_generation().unwrap();
        assert_eq!(job.base_image, Some(a));
        let b_id = {
            let it = session.finish_generation(Ok(b.clone())).unwrap();
            assert_eq!(it.prompt, "Add plants");
            assert_eq!(it.parent, Some(NodeRef::Source));
            it.id.clone()
        };
        assert_eq!(session.store().active(), Some(&NodeRef::Iteration(b_id.clone())));
        assert_eq!(session.store().resolve_active_image(), Some(&b));

        session.set_prompt("Make it blue");
        let job = session.begin_generation().unwrap();
        assert_eq!(job.base_image, Some(b));
        let c_id = {
            let it = session.finish_generation(Ok(c.clone())).unwrap();
            assert_eq!(it.parent, Some(NodeRef::Iteration(b_id.clone())));
            it.id.clone()
        };

        let ids: Vec<_> = session.store().iterations().map(|it| it.id.clone()).collect();
        assert_eq!(ids, vec![c_id.clone(), b_id]);
        assert_eq!(session.store().active(), Some(&NodeRef::Iteration(c_id)));
        assert_eq!(session.store().resolve_active_image(), Some(&c));
    }
}
