/// Left-hand image list with selection checkboxes and hover previews
use iced::widget::{checkbox, column, container, image, scrollable, text, tooltip, Column};
use iced::{Element, Length};

use crate::state::library::Library;
use crate::state::selection::Selection;
use crate::Message;

const PREVIEW_SIZE: f32 = 200.0;

pub const HINT: &str = "Select 2 images to combine. Drag to move images, scroll to zoom";

pub fn view<'a>(library: &'a Library, selection: &'a Selection) -> Element<'a, Message> {
    let entries = library.iter().map(|record| {
        let id = record.id;
        let entry = checkbox(record.name.as_str(), selection.contains(id))
            .on_toggle(move |_| Message::ToggleSelection(id));

        let preview = container(
            column![
                image(record.handle.clone())
                    .width(Length::Fixed(PREVIEW_SIZE))
                    .height(Length::Fixed(PREVIEW_SIZE)),
                text(record.path.display().to_string()).size(11),
            ]
            .spacing(4)
            .max_width(PREVIEW_SIZE),
        )
        .padding(4)
        .style(container::rounded_box);

        tooltip(entry, preview, tooltip::Position::Right).into()
    });

    let list: Element<'a, Message> = if library.is_empty() {
        text("No images yet. Use Upload files or Upload folder.")
            .size(13)
            .into()
    } else {
        Column::with_children(entries).spacing(10).into()
    };

    let counter = text(format!(
        "{} images, {} selected",
        library.len(),
        selection.len()
    ))
    .size(12);

    column![
        text(HINT).size(14),
        counter,
        scrollable(list).height(Length::Fill),
    ]
    .spacing(12)
    .padding(16)
    .width(Length::Fill)
    .into()
}
