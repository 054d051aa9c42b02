use iced::widget::{button, column, container, row, text, Image};
use iced::{Alignment, ContentFit, Element, Length};

use super::{node_label, ImageHandles};
use crate::state::{IterationStore, NodeRef};
use crate::Message;

/// Large view of the active image
pub fn view<'a>(store: &IterationStore, handles: &ImageHandles, generating: bool) -> Element<'a, Message> {
    let Some((node, _)) = store.resolve_active() else {
        return container(
            text("Upload a photo to edit, or describe an image to generate one.").size(16),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into();
    };

    let picture: Element<'a, Message> = match handles.get(&node) {
        Some(handle) => Image::new(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => text("Image unavailable").into(),
    };

    let header = row![
        text(breadcrumb(store, &node)).size(14).width(Length::Fill),
        button("Download")
            .on_press_maybe((!generating).then_some(Message::DownloadPressed))
            .padding(8),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut content = column![header].spacing(10);
    if let NodeRef::Iteration(id) = &node {
        if let Some(iteration) = store.get(id) {
            content = content.push(text(format!("“{}”", iteration.prompt)).size(14));
        }
    }

    content.push(picture).height(Length::Fill).into()
}

/// "Source → #1 → #3" for the given node
fn breadcrumb(store: &IterationStore, node: &NodeRef) -> String {
    match node {
        NodeRef::Source => node_label(store, node),
        NodeRef::Iteration(id) => store
            .lineage(id)
            .iter()
            .map(|step| node_label(store, step))
            .collect::<Vec<_>>()
            .join(" → "),
    }
}
