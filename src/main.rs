use iced::widget::{button, column, container, row, text, text_input, Column};
use iced::{Color, Element, Length, Task, Theme};
use log::{error, info, warn};
use std::path::PathBuf;

mod config;
mod error;
mod generation;
mod image_io;
mod state;
mod ui;

use config::Settings;
use error::{GenerationError, ImageIoError};
use generation::GenerationClient;
use state::{EditorSession, EncodedImage, NodeRef};
use ui::ImageHandles;

/// Main application state
struct PromptStudio {
    /// Source image, iterations and the generation lifecycle
    session: EditorSession,
    /// Client for the generation API (or why it could not be built)
    client: Result<GenerationClient, GenerationError>,
    /// Decoded handles for every image in the session
    handles: ImageHandles,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Upload Photo"
    UploadPressed,
    /// Upload dialog closed (None = cancelled)
    SourceLoaded(Result<Option<EncodedImage>, ImageIoError>),
    /// User removed the source image
    ClearSource,
    /// Prompt text edited
    PromptChanged(String),
    /// User asked for a generation
    Generate,
    /// The generation request finished
    GenerationComplete(Result<EncodedImage, GenerationError>),
    /// User picked a tile in the history
    Select(NodeRef),
    /// User clicked "Download"
    DownloadPressed,
    /// Save dialog closed (None = cancelled)
    DownloadComplete(Result<Option<PathBuf>, ImageIoError>),
}

impl PromptStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();

        if !settings.has_api_key() {
            warn!("No API key configured; generations will fail until GEMINI_API_KEY is set");
        }

        let client = GenerationClient::new(&settings);
        match &client {
            Ok(client) => info!("🎨 Prompt Studio initialized (model: {})", client.model()),
            Err(err) => error!("Failed to initialize the generation client: {}", err),
        }

        (
            PromptStudio {
                session: EditorSession::new(),
                client,
                handles: ImageHandles::default(),
                status: "Ready. Upload a photo to get started.".to_string(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadPressed => {
                return Task::perform(image_io::pick_image(), Message::SourceLoaded);
            }
            Message::SourceLoaded(Ok(Some(image))) => {
                self.handles.insert(NodeRef::Source, &image);
                self.session.store_mut().set_source(image);
                self.session.clear_error();
                self.status = "Photo loaded. Describe an edit below.".to_string();
            }
            Message::SourceLoaded(Ok(None)) => {}
            Message::SourceLoaded(Err(err)) => {
                warn!("Upload failed: {}", err);
                self.session.set_error(format!("Could not load the photo: {err}"));
            }
            Message::ClearSource => {
                self.session.store_mut().clear_source();
                self.handles.remove(&NodeRef::Source);
                self.status = "Photo removed.".to_string();
            }
            Message::PromptChanged(prompt) => {
                self.session.set_prompt(prompt);
            }
            Message::Generate => {
                let job = match self.session.begin_generation() {
                    Ok(job) => job,
                    Err(err) => {
                        if err.is_validation() {
                            info!("Generation not started: {}", err);
                        } else {
                            warn!("Generation not started: {}", err);
                        }
                        return Task::none();
                    }
                };

                match &self.client {
                    Ok(client) => {
                        let client = client.clone();
                        self.status = "Generating…".to_string();
                        return Task::perform(
                            async move { client.generate(&job.prompt, job.base_image.as_ref()).await },
                            Message::GenerationComplete,
                        );
                    }
                    Err(err) => {
                        self.session.finish_generation(Err(err.clone()));
                        self.status = "Generation failed. You can try again.".to_string();
                    }
                }
            }
            Message::GenerationComplete(result) => {
                match self.session.finish_generation(result) {
                    Some(iteration) => {
                        self.handles
                            .insert(NodeRef::Iteration(iteration.id.clone()), &iteration.image);
                        self.status = format!("Done: “{}”", iteration.prompt);
                    }
                    None => {
                        self.status = "Generation failed. You can try again.".to_string();
                    }
                }
            }
            Message::Select(node) => {
                if let Err(err) = self.session.store_mut().set_active(node) {
                    warn!("Ignoring selection: {}", err);
                }
            }
            Message::DownloadPressed => {
                if let Some(image) = self.session.store().resolve_active_image() {
                    return Task::perform(
                        image_io::save_image_as(image.clone()),
                        Message::DownloadComplete,
                    );
                }
            }
            Message::DownloadComplete(Ok(Some(path))) => {
                self.status = format!("Saved to {}", path.display());
            }
            Message::DownloadComplete(Ok(None)) => {}
            Message::DownloadComplete(Err(err)) => {
                error!("Download failed: {}", err);
                self.session.set_error(format!("Could not save the image: {err}"));
            }
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let generating = self.session.is_generating();
        let has_source = self.session.store().source().is_some();

        let prompt_input = text_input("Describe the edit, e.g. “Add plants”", self.session.prompt())
            .on_input_maybe((!generating).then_some(Message::PromptChanged))
            .on_submit_maybe((!generating).then_some(Message::Generate))
            .padding(10);

        let generate_label = if generating { "Generating…" } else { "Generate" };

        let mut controls: Column<Message> = column![
            text("Prompt Studio").size(32),
            row![
                button("Upload Photo")
                    .on_press_maybe((!generating).then_some(Message::UploadPressed))
                    .padding(10),
                button("Remove Photo")
                    .on_press_maybe((has_source && !generating).then_some(Message::ClearSource))
                    .style(button::danger)
                    .padding(10),
            ]
            .spacing(10),
            prompt_input,
            button(generate_label)
                .on_press_maybe((!generating).then_some(Message::Generate))
                .padding(10),
            text(&self.status).size(14),
        ]
        .spacing(16)
        .width(Length::Fixed(320.0));

        if let Some(err) = self.session.error() {
            controls = controls.push(text(err.to_string()).size(14).color(Color::from_rgb(0.95, 0.4, 0.4)));
        }

        let top = row![
            controls,
            ui::preview::view(self.session.store(), &self.handles, generating),
        ]
        .spacing(24)
        .height(Length::Fill);

        let content = column![top, ui::history::view(self.session.store(), &self.handles)]
            .spacing(20)
            .padding(24);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("prompt_studio=info"))
        .init();

    iced::application(
        "Prompt Studio",
        PromptStudio::update,
        PromptStudio::view,
    )
    .theme(PromptStudio::theme)
    .centered()
    .run_with(PromptStudio::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_app() -> PromptStudio {
        PromptStudio {
            session: EditorSession::new(),
            client: Err(GenerationError::failed("could not build the HTTP client")),
            handles: ImageHandles::default(),
            status: String::new(),
        }
    }

    #[test]
    fn test_empty_prompt_reports_validation_before_client_error() {
        let mut app = offline_app();
        app.session.set_prompt("   ");

        let _ = app.update(Message::Generate);

        assert_eq!(app.session.error(), Some("Please enter a prompt describing the edit."));
        assert!(!app.session.is_generating());
    }

    #[test]
    fn test_client_error_surfaces_and_returns_to_idle() {
        let mut app = offline_app();
        app.session.store_mut().set_source(EncodedImage::new("image/png", vec![1u8]));
        let _ = app.update(Message::PromptChanged("Add plants".to_string()));

        let _ = app.update(Message::Generate);

        assert_eq!(
            app.session.error(),
            Some("Generation failed: could not build the HTTP client")
        );
        assert!(!app.session.is_generating());
        assert!(app.session.store().is_empty());
        assert_eq!(app.session.store().active(), Some(&NodeRef::Source));
    }
}
