use super::model::Carousel;
use super::{ACTIVE_DOT, INACTIVE_DOT};
use vitrinectl::catalog::Item;

fn card_label(item: &Item) -> String {
    let badge = item.kind.badge();
    if badge.is_empty() {
        item.title.to_string()
    } else {
        format!("{} ({})", item.title, badge)
    }
}

fn indicators(carousel: &Carousel) -> String {
    (0..carousel.len())
        .map(|i| {
            if carousel.cursor() == Some(i) {
                ACTIVE_DOT
            } else {
                INACTIVE_DOT
            }
        })
        .collect()
}

/// One-line text rendering of the visible cards and the indicator dots.
pub fn render(carousel: &Carousel) -> String {
    if carousel.is_empty() {
        return "[empty]".to_string();
    }

    let cards: Vec<String> = carousel
        .visible()
        .items
        .into_iter()
        .map(card_label)
        .collect();

    format!("[{}] {}", cards.join(" | "), indicators(carousel))
}
