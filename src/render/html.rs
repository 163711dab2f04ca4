//! HTML card tiles.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{CardRenderer, CardView};

const FLIP_BUTTON: &str = "<button class=\"flip-button\" onclick=\"event.stopPropagation(); \
this.closest('.card').classList.toggle('flipped')\">Flip Card</button>";

/// Renders card tiles for the deck and comparison pages.
///
/// All card text is escaped; art URLs are escaped as attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Wrap rendered sections in the page's card grid.
    #[must_use]
    pub fn grid(&self, sections: &[String]) -> String {
        format!("<div class=\"cards-grid\">{}</div>", sections.concat())
    }
}

impl CardRenderer for HtmlRenderer {
    fn render(&self, card: &CardView<'_>) -> String {
        let meta = card.metadata;
        let display_id = card.id.display();
        let canonical = card.id.canonical();
        let name = encode_text(&meta.name);
        let alt_name = encode_double_quoted_attribute(&meta.name);

        let mut html = String::with_capacity(512);
        let class = card
            .css_class()
            .map_or_else(|| "card".to_string(), |c| format!("card {c}"));
        html.push_str(&format!("<div class=\"{class}\" data-card-id=\"{display_id}\">"));

        html.push_str(&format!("<div class=\"card-id\"><span>{display_id}</span>"));
        if meta.double_sided {
            html.push_str(FLIP_BUTTON);
        }
        html.push_str("</div>");

        let label = card.count_label();
        if !label.is_empty() {
            html.push_str(&format!("<div class=\"card-counts\">{}</div>", encode_text(&label)));
        }
        html.push_str(&format!("<div class=\"card-name\">{name}</div>"));

        if !meta.aspects.is_empty() {
            html.push_str("<div class=\"aspects\">");
            for aspect in &meta.aspects {
                html.push_str(&format!(
                    "<span class=\"aspect {}\">{}</span>",
                    encode_double_quoted_attribute(aspect),
                    encode_text(aspect)
                ));
            }
            html.push_str("</div>");
        }

        html.push_str("<div class=\"card-images\"><div class=\"card-images-inner\"><div class=\"card-front\">");
        match &meta.front_art {
            Some(url) => html.push_str(&format!(
                "<img src=\"{}\" alt=\"{alt_name} (Front)\">",
                encode_double_quoted_attribute(url)
            )),
            None => html.push_str(&format!("<div class=\"card-placeholder\">{canonical}</div>")),
        }
        html.push_str("</div>");
        if let (true, Some(url)) = (meta.double_sided, &meta.back_art) {
            html.push_str(&format!(
                "<div class=\"card-back\"><img src=\"{}\" alt=\"{alt_name} (Back)\"></div>",
                encode_double_quoted_attribute(url)
            ));
        }
        html.push_str("</div></div>");

        let stats = card.stats();
        html.push_str("<div class=\"card-content\">");
        if !stats.is_empty() {
            html.push_str("<div class=\"card-stats\">");
            for (label, value) in stats {
                html.push_str(&format!(
                    "<span class=\"stat\" data-type=\"{label}\">{label}: <span class=\"stat-value\">{}</span></span>",
                    encode_text(value)
                ));
            }
            html.push_str("</div>");
        }
        html.push_str("</div></div>");
        html
    }

    fn section(&self, title: &str, cards: &[String]) -> String {
        format!(
            "<div class=\"set-section\"><div class=\"set-title\">{}</div><div class=\"card-grid\">{}</div></div>",
            encode_text(title),
            cards.concat()
        )
    }

    fn comparison_section(&self, title: &str, cards: &[String]) -> String {
        format!(
            "<div class=\"comparison-section\"><div class=\"comparison-header\">{}</div>\
<div class=\"comparison-content\"><div class=\"card-grid\">{}</div></div></div>",
            encode_text(title),
            cards.concat()
        )
    }

    fn heading(&self, text: &str) -> String {
        format!("<h2>{}</h2>", encode_text(text))
    }

    fn summary(&self, stats: &[(String, usize)]) -> String {
        let mut html = String::from("<div class=\"summary-stats\">");
        for (label, count) in stats {
            html.push_str(&format!(
                "<div class=\"stat-card\"><div class=\"stat-number\">{count}</div>\
<div class=\"stat-label\">{}</div></div>",
                encode_text(label)
            ));
        }
        html.push_str("</div>");
        html
    }

    fn page(&self, sections: &[String]) -> String {
        self.grid(sections)
    }
}
