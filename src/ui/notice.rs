/// Transient user-facing messages ("toasts")
use iced::widget::{container, text, Column};
use iced::{Border, Color, Element, Theme};

use crate::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

impl Level {
    fn color(self) -> Color {
        match self {
            Level::Success => Color::from_rgb(0.22, 0.62, 0.29),
            Level::Warning => Color::from_rgb(0.85, 0.6, 0.1),
            Level::Error => Color::from_rgb(0.8, 0.2, 0.2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: Level,
    pub text: String,
}

/// Stack of visible notices, newest last
#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    /// Show a notice and return its id for later dismissal
    pub fn push(&mut self, level: Level, text: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notice {
            id,
            level,
            text: text.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|notice| notice.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let toasts = self.iter().map(|notice| {
            let background = notice.level.color();

            container(text(notice.text.as_str()).size(14))
                .padding([8, 14])
                .style(move |_theme: &Theme| container::Style {
                    background: Some(background.into()),
                    text_color: Some(Color::WHITE),
                    border: Border {
                        radius: 6.0.into(),
                        ..Border::default()
                    },
                    ..container::Style::default()
                })
                .into()
        });

        Column::with_children(toasts).spacing(8).into()
    }
}
