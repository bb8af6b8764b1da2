/// Shared card renderers for flower grids and sighting lists.
use iced::widget::{button, column, container, image, row, text, horizontal_space};
use iced::{Alignment, ContentFit, Element, Length};

use crate::api::models::{Flower, Sighting};
use crate::state::likes::LikeStatus;
use crate::ui::{like_color, ACCENT};

/// One flower in a grid: picture, names, sightings count, and the
/// favorite star.
pub fn flower_card<'a, M: Clone + 'a>(
    flower: &'a Flower,
    picture: Option<&image::Handle>,
    favorited: bool,
    on_open: M,
    on_toggle: M,
) -> Element<'a, M> {
    let photo: Element<'a, M> = match picture {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(150.0))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("🌸").size(44))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(150.0))
            .into(),
    };

    let title = column![
        photo,
        text(&flower.name).size(17),
        text(&flower.latin_name).size(12),
    ]
    .spacing(6)
    .align_x(Alignment::Center);

    let star = button(text(if favorited { "★" } else { "☆" }).size(18).color(
        if favorited {
            ACCENT
        } else {
            iced::Color::from_rgb(0.66, 0.69, 0.7)
        },
    ))
    .style(button::text)
    .on_press(on_toggle);

    let footer = row![
        text(format!("{} sightings", flower.sightings)).size(12),
        horizontal_space(),
        star,
    ]
    .align_y(Alignment::Center);

    container(
        column![
            button(title).style(button::text).on_press(on_open),
            footer,
        ]
        .spacing(4),
    )
    .style(container::rounded_box)
    .padding(10)
    .width(Length::Fixed(220.0))
    .into()
}

/// One sighting in a list: photo, title, flower, place, description
/// snippet, like and comment counters.
pub fn sighting_card<'a, M: Clone + 'a>(
    sighting: &'a Sighting,
    picture: Option<&image::Handle>,
    status: LikeStatus,
    place: Option<&'a str>,
    on_open: M,
    on_like: M,
) -> Element<'a, M> {
    let photo: Element<'a, M> = match picture {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(180.0))
            .height(Length::Fixed(130.0))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("🌿").size(36))
            .center_x(Length::Fixed(180.0))
            .center_y(Length::Fixed(130.0))
            .into(),
    };

    let flower_name = sighting
        .flower
        .as_ref()
        .map(|flower| flower.name.as_str())
        .unwrap_or("Unknown flower");

    let mut details = column![
        button(text(&sighting.name).size(18))
            .style(button::text)
            .on_press(on_open),
        text(flower_name).size(13).color(ACCENT),
    ]
    .spacing(4);

    if let Some(place) = place {
        details = details.push(text(place).size(12));
    }

    details = details.push(text(snippet(&sighting.description, 160)).size(13));

    let like = button(
        text(format!("♥ {}", status.count))
            .size(14)
            .color(like_color(status.liked)),
    )
    .style(button::text)
    .on_press(on_like);

    let counters = row![
        like,
        text(format!("💬 {}", sighting.comments_count)).size(14),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    details = details.push(counters);

    container(row![photo, details].spacing(16))
        .style(container::rounded_box)
        .padding(12)
        .width(Length::Fill)
        .into()
}

/// Shorten long text for cards, on a character boundary.
fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(snippet("hello", 10), "hello");
    }

    #[test]
    fn long_text_is_cut_with_an_ellipsis() {
        assert_eq!(snippet("hello world", 5), "hello…");
        assert_eq!(snippet("hello world", 6), "hello…");
    }

    #[test]
    fn multibyte_text_cuts_on_char_boundaries() {
        assert_eq!(snippet("šuma šuma", 4), "šuma…");
    }
}
