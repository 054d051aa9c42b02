use iced::widget::{button, column, container, scrollable, text, Image};
use iced::{ContentFit, Element, Length};
use iced_aw::Wrap;

use super::{node_label, ImageHandles};
use crate::state::{IterationStore, NodeRef};
use crate::Message;

const THUMB_WIDTH: f32 = 140.0;
const THUMB_HEIGHT: f32 = 100.0;
const CAPTION_CHARS: usize = 24;

/// Iteration history: the source tile first, then iterations newest first
pub fn view<'a>(store: &IterationStore, handles: &ImageHandles) -> Element<'a, Message> {
    let mut tiles: Vec<Element<'a, Message>> = Vec::with_capacity(store.len() + 1);

    if store.source().is_some() {
        tiles.push(tile(store, handles, NodeRef::Source, "Original".to_string()));
    }
    for iteration in store.iterations() {
        tiles.push(tile(
            store,
            handles,
            NodeRef::Iteration(iteration.id.clone()),
            caption(&iteration.prompt),
        ));
    }

    if tiles.is_empty() {
        return text("No iterations yet.").size(14).into();
    }

    scrollable(Wrap::with_elements(tiles).spacing(10.0).line_spacing(10.0))
        .height(Length::Fixed(THUMB_HEIGHT * 2.0 + 80.0))
        .width(Length::Fill)
        .into()
}

fn tile<'a>(
    store: &IterationStore,
    handles: &ImageHandles,
    node: NodeRef,
    caption: String,
) -> Element<'a, Message> {
    let is_active = store.active() == Some(&node);

    let thumb: Element<'a, Message> = match handles.get(&node) {
        Some(handle) => Image::new(handle.clone())
            .content_fit(ContentFit::Cover)
            .width(Length::Fixed(THUMB_WIDTH))
            .height(Length::Fixed(THUMB_HEIGHT))
            .into(),
        None => container(text("…"))
            .width(Length::Fixed(THUMB_WIDTH))
            .height(Length::Fixed(THUMB_HEIGHT))
            .into(),
    };

    let label = format!("{} {}", node_label(store, &node), caption);

    button(column![thumb, text(label).size(12)].spacing(4).width(Length::Fixed(THUMB_WIDTH)))
        .on_press(Message::Select(node))
        .style(if is_active { button::primary } else { button::secondary })
        .padding(6)
        .into()
}

/// Prompt shortened for a tile caption
fn caption(prompt: &str) -> String {
    if prompt.chars().count() <= CAPTION_CHARS {
        prompt.to_string()
    } else {
        let short: String = prompt.chars().take(CAPTION_CHARS - 1).collect();
        format!("{}…", short.trim_end())
    }
}
