/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The image lineage graph (store.rs)
/// - The generation lifecycle around it (session.rs)

pub mod data;
pub mod session;
pub mod store;

pub use data::{EncodedImage, Iteration, NodeRef};
pub use session::{EditorSession, GenerationJob};
pub use store::IterationStore;
