use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::state::compositor::{Compositor, WheelDirection};
use crate::state::data::Scene;
use crate::Message;

const BORDER_COLOR: Color = Color::from_rgb(0.85, 0.85, 0.85);

/// Interactive canvas for the selected pair
///
/// The widget is shown at `display_scale` times the drawing-buffer size;
/// every position it reports back is converted to buffer pixels first.
pub struct CompositorCanvas<'a> {
    pub scene: Scene,
    pub compositor: &'a Compositor,
    /// Screen pixels per buffer pixel (≤ 1.0)
    pub display_scale: f32,
}

impl CompositorCanvas<'_> {
    fn to_buffer(&self, position: Point) -> Point {
        Point::new(position.x / self.display_scale, position.y / self.display_scale)
    }
}

impl Program<Message> for CompositorCanvas<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        frame.with_clip(Rectangle::with_size(bounds.size()), |frame| {
            frame.scale(self.display_scale);

            // slot 0 first, so slot 1 ends up on top
            for layer in &self.scene.layers {
                let transform = layer.transform;
                let scaled = transform.scaled(layer.natural_size());

                frame.draw_image(
                    Rectangle::new(
                        Point::new(transform.x, transform.y),
                        Size::new(scaled.width, scaled.height),
                    ),
                    canvas::Image::new(layer.handle.clone()),
                );
            }
        });

        frame.stroke(
            &Path::rectangle(Point::ORIGIN, bounds.size()),
            Stroke::default().with_color(BORDER_COLOR).with_width(1.0),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let dragging = self.compositor.is_dragging();

        match event {
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };

                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                let direction = if y > 0.0 {
                    WheelDirection::Up
                } else if y < 0.0 {
                    WheelDirection::Down
                } else {
                    return (canvas::event::Status::Ignored, None);
                };

                return (
                    canvas::event::Status::Captured,
                    Some(Message::Wheel(self.to_buffer(position), direction)),
                );
            }

            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::PointerDown(self.to_buffer(position))),
                    );
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if dragging {
                    return (canvas::event::Status::Captured, Some(Message::PointerUp));
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if dragging {
                    // leaving the canvas ends the drag
                    let message = match cursor.position_in(bounds) {
                        Some(position) => Message::PointerMoved(self.to_buffer(position)),
                        None => Message::PointerUp,
                    };
                    return (canvas::event::Status::Captured, Some(message));
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                if dragging {
                    return (canvas::event::Status::Captured, Some(Message::PointerUp));
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if self.compositor.is_dragging() {
            return mouse::Interaction::Grabbing;
        }

        match cursor.position_in(bounds) {
            Some(position) if self.compositor.hit_test(self.to_buffer(position)).is_some() => {
                mouse::Interaction::Grab
            }
            _ => mouse::Interaction::default(),
        }
    }
}
