// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Before permission is granted only the gate is shown. The camera screen is
//! a column of the live preview, the controls row and, once a photo has been
//! saved, its thumbnail.

use crate::app::screen::CameraScreen;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use crate::permission::PermissionGate;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget::{self, icon};

/// Flash icon SVG (lightning bolt)
const FLASH_ICON: &[u8] = include_bytes!("../../resources/button_icons/flash.svg");
/// Flash off icon SVG (lightning bolt with strike-through)
const FLASH_OFF_ICON: &[u8] = include_bytes!("../../resources/button_icons/flash-off.svg");
/// Camera switch icon SVG (camera with circular arrows)
const CAMERA_SWITCH_ICON: &[u8] = include_bytes!("../../resources/button_icons/camera-switch.svg");

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let content = match (&self.permission, &self.screen) {
            (PermissionGate::Resolved(outcome), Some(screen)) if outcome.is_granted() => {
                self.camera_screen(screen)
            }
            (PermissionGate::Resolved(_), _) => Self::centered_text(fl!("permission-required")),
            _ => widget::Space::new(Length::Fill, Length::Fill).into(),
        };

        widget::toaster(&self.toasts, content)
    }

    fn centered_text<'a>(text: String) -> Element<'a, Message> {
        widget::container(widget::text::body(text))
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .padding(ui::CONTROLS_PADDING)
            .into()
    }

    fn camera_screen<'a>(&'a self, screen: &'a CameraScreen) -> Element<'a, Message> {
        let preview = self.build_preview(screen);

        // Flash: white overlay above the preview, controls hidden
        if screen.flash_active() {
            let flash_overlay = widget::container(widget::Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| widget::container::Style {
                    background: Some(Background::Color(Color::WHITE)),
                    ..Default::default()
                });

            return cosmic::iced::widget::stack![preview, flash_overlay]
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        let mut column = widget::column()
            .push(preview)
            .push(self.build_controls(screen))
            .width(Length::Fill)
            .height(Length::Fill);

        if screen.last_saved().is_some()
            && let Some(thumbnail) = &self.thumbnail
        {
            let image = widget::image(thumbnail.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fixed(ui::THUMBNAIL_HEIGHT));
            let button = widget::button::custom(image)
                .on_press(Message::OpenLastPhoto)
                .padding(0)
                .class(cosmic::theme::Button::Image);

            column = column.push(
                widget::container(widget::tooltip(
                    button,
                    widget::text::body(fl!("last-photo")),
                    widget::tooltip::Position::Top,
                ))
                .width(Length::Fill)
                .center_x(Length::Fill)
                .padding(ui::THUMBNAIL_PADDING),
            );
        }

        column.into()
    }

    fn build_preview(&self, screen: &CameraScreen) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.preview {
            Some(handle) if screen.is_bound() => widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            _ => {
                let text = if screen.bind_failed() {
                    fl!("camera-unavailable")
                } else {
                    fl!("camera-starting")
                };
                widget::text::body(text).into()
            }
        };

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                text_color: Some(Color::WHITE),
                ..Default::default()
            })
            .into()
    }

    /// Themed icon button with a tooltip above it
    fn control_button<'a>(
        handle: icon::Handle,
        message: Message,
        tooltip: String,
        highlighted: bool,
    ) -> Element<'a, Message> {
        let content = widget::container(widget::icon(handle).size(ui::CONTROL_ICON_SIZE))
            .center(Length::Shrink)
            .padding(ui::THUMBNAIL_PADDING);

        let button = widget::button::custom(content)
            .on_press(message)
            .padding(0)
            .class(if highlighted {
                cosmic::theme::Button::Suggested
            } else {
                cosmic::theme::Button::Text
            });

        widget::tooltip(
            button,
            widget::text::body(tooltip),
            widget::tooltip::Position::Top,
        )
        .into()
    }

    /// Flip, flash, capture and (after the first photo) gallery
    fn build_controls(&self, screen: &CameraScreen) -> Element<'_, Message> {
        let flip_button = Self::control_button(
            icon::from_svg_bytes(CAMERA_SWITCH_ICON).symbolic(true),
            Message::FlipCamera,
            fl!("switch-camera"),
            false,
        );

        let flash_icon = if screen.flash_enabled() {
            FLASH_ICON
        } else {
            FLASH_OFF_ICON
        };
        let flash_button = Self::control_button(
            icon::from_svg_bytes(flash_icon).symbolic(true),
            Message::ToggleFlash,
            fl!("flash"),
            screen.flash_enabled(),
        );

        let mut row = widget::row()
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(flip_button)
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(flash_button)
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(self.build_capture_button(screen))
            .push(widget::Space::new(Length::Fill, Length::Shrink));

        if screen.last_saved().is_some() {
            row = row
                .push(Self::control_button(
                    icon::from_name("folder-pictures-symbolic").handle(),
                    Message::OpenLastPhoto,
                    fl!("gallery"),
                    false,
                ))
                .push(widget::Space::new(Length::Fill, Length::Shrink));
        }

        row.align_y(Alignment::Center)
            .width(Length::Fill)
            .padding(ui::CONTROLS_PADDING)
            .into()
    }

    /// White circle, gray and slightly pressed while a capture is running
    fn build_capture_button(&self, screen: &CameraScreen) -> Element<'_, Message> {
        let capturing = screen.is_capturing();
        let color = if !screen.is_bound() {
            Color::from_rgba(0.5, 0.5, 0.5, 0.3)
        } else if capturing {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else {
            Color::WHITE
        };
        let (inner_size, outer_size) = if capturing {
            (ui::CAPTURE_BUTTON_INNER * 0.85, ui::CAPTURE_BUTTON_OUTER * 0.85)
        } else {
            (ui::CAPTURE_BUTTON_INNER, ui::CAPTURE_BUTTON_OUTER)
        };

        let button_inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: (inner_size / 2.0).into(),
                ..Default::default()
            },
            ..Default::default()
        });

        // Taps without a bound endpoint are no-ops anyway; keep the button live
        let button = widget::button::custom(button_inner)
            .on_press(Message::Capture)
            .padding(0)
            .width(Length::Fixed(outer_size))
            .height(Length::Fixed(outer_size));

        let wrapper = widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER);

        widget::tooltip(
            wrapper,
            widget::text::body(fl!("take-photo")),
            widget::tooltip::Position::Top,
        )
        .into()
    }
}
