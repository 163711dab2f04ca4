//! Plain-text renderer for terminals.

use super::{CardRenderer, CardView};

/// Renders one line per card: `SOR 005  Deck: 2  Luke Skywalker [Vigilance, Heroism] Cost: 6`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextRenderer;

impl CardRenderer for TextRenderer {
    fn render(&self, card: &CardView<'_>) -> String {
        let mut line = format!(
            "{:<8} {:<22} {}",
            card.id.display(),
            card.count_label(),
            card.metadata.name
        );
        if !card.metadata.aspects.is_empty() {
            line.push_str(&format!(" [{}]", card.metadata.aspects.join(", ")));
        }
        for (label, value) in card.stats() {
            line.push_str(&format!(" {label}: {value}"));
        }
        if card.metadata.double_sided {
            line.push_str(" (double-sided)");
        }
        line.trim_end().to_string()
    }

    fn section(&self, title: &str, cards: &[String]) -> String {
        let mut out = format!("== {title} ({}) ==\n", cards.len());
        for card in cards {
            out.push_str("  ");
            out.push_str(card);
            out.push('\n');
        }
        out
    }

    fn heading(&self, text: &str) -> String {
        format!("{text}\n")
    }

    fn summary(&self, stats: &[(String, usize)]) -> String {
        let line: Vec<String> = stats
            .iter()
            .map(|(label, count)| format!("{label}: {count}"))
            .collect();
        format!("{}\n\n", line.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardMetadata};

    #[test]
    fn test_render_line() {
        let id = CardId::new("SOR", 5);
        let mut meta = CardMetadata::placeholder(&id);
        meta.name = "Luke Skywalker".into();
        meta.aspects.push("Vigilance".into());
        meta.cost = Some("6".into());

        let line = TextRenderer.render(&CardView::deck(&id, &meta, 2, 0));
        assert!(line.starts_with("SOR 005"));
        assert!(line.contains("Deck: 2"));
        assert!(line.ends_with("Luke Skywalker [Vigilance] Cost: 6"));
    }

    #[test]
    fn test_section_header() {
        let out = TextRenderer.section("Cost: 2", &["a".into(), "b".into()]);
        assert_eq!(out, "== Cost: 2 (2) ==\n  a\n  b\n");
    }

    #[test]
    fn test_summary_line() {
        let stats = [("Same Cards".to_string(), 2), ("Different Counts".to_string(), 0)];
        assert_eq!(TextRenderer.summary(&stats), "Same Cards: 2 | Different Counts: 0\n\n");
    }
}
