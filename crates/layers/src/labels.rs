//! Tooltip content for hovered countries.

use formats::{LivedRecord, duration_text};

use crate::country::CountryRecord;
use crate::view_mode::ViewMode;

/// Offset of the tooltip from the pointer's page position.
pub const TOOLTIP_OFFSET: [f64; 2] = [16.0, -28.0];

pub const LIVED_SECTION_TITLE: &str = "Lived here";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivedLine {
    pub city: String,
    pub timeline: String,
    pub description: String,
}

impl LivedLine {
    fn from_record(record: &LivedRecord) -> Self {
        let city = if record.primary_city.is_empty() {
            record.cities.first().cloned().unwrap_or_default()
        } else {
            record.primary_city.clone()
        };
        Self {
            city,
            timeline: record.timeline.clone(),
            description: record.description.clone(),
        }
    }

    fn is_empty(&self) -> bool {
        self.city.is_empty() && self.timeline.is_empty() && self.description.is_empty()
    }

    fn to_html(&self) -> String {
        let mut detail = Vec::new();
        if !self.city.is_empty() {
            detail.push(format!(
                "<strong class=\"country-tooltip__city\">{}</strong>",
                escape_html(&self.city)
            ));
        }
        if !self.timeline.is_empty() {
            detail.push(escape_html(&self.timeline));
        }
        let detail = detail.join(" · ");
        let description = escape_html(&self.description);
        match (description.is_empty(), detail.is_empty()) {
            (false, false) => format!("{description} — {detail}"),
            (false, true) => description,
            (true, _) => detail,
        }
    }
}

/// What the tooltip shows for one country under the active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub title: String,
    /// Explorer view only, and only when it differs from the title.
    pub fact: Option<String>,
    /// Lived view only.
    pub lived: Vec<LivedLine>,
    /// Summed length of all stays, when at least a week.
    pub total: Option<String>,
}

impl TooltipContent {
    pub fn build(record: &CountryRecord, view: ViewMode, lived: &[LivedRecord]) -> Self {
        let fact = match view {
            ViewMode::Explorer => record.fact.clone().filter(|f| *f != record.name),
            _ => None,
        };

        let (lived, total) = if view == ViewMode::Lived {
            let lines: Vec<LivedLine> = lived
                .iter()
                .map(LivedLine::from_record)
                .filter(|l| !l.is_empty())
                .collect();
            let days: u32 = lived.iter().map(|r| r.duration_days).fold(0, u32::saturating_add);
            let total = Some(duration_text(days)).filter(|t| !t.is_empty());
            (lines, total)
        } else {
            (Vec::new(), None)
        };

        Self {
            title: record.name.clone(),
            fact,
            lived,
            total,
        }
    }

    /// Escaped markup for the tooltip element.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<span class=\"country-tooltip__title\">{}</span>",
            escape_html(&self.title)
        );
        if let Some(fact) = &self.fact {
            html.push_str(&format!(
                "<span class=\"country-tooltip__fact\">{}</span>",
                escape_html(fact)
            ));
        }
        if !self.lived.is_empty() {
            html.push_str(&format!(
                "<span class=\"country-tooltip__section-title\">{}</span>",
                escape_html(LIVED_SECTION_TITLE)
            ));
            if let Some(total) = &self.total {
                html.push_str(&format!(
                    "<span class=\"country-tooltip__total\">{}</span>",
                    escape_html(&format!("Total: {total}"))
                ));
            }
            for line in &self.lived {
                html.push_str(&format!(
                    "<span class=\"country-tooltip__lived-entry\">{}</span>",
                    line.to_html()
                ));
            }
        }
        html
    }
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Tooltip position for a pointer at page coordinates.
pub fn tooltip_position(page_x: f64, page_y: f64) -> [f64; 2] {
    [page_x + TOOLTIP_OFFSET[0], page_y + TOOLTIP_OFFSET[1]]
}

#[cfg(test)]
mod tests {
    use super::{TooltipContent, escape_html, tooltip_position};
    use crate::country::CountryRecord;
    use crate::symbology::Rgb;
    use crate::view_mode::ViewMode;
    use formats::{LivedRecord, LivedRecordInput};
    use pretty_assertions::assert_eq;

    fn record(name: &str, fact: Option<&str>) -> CountryRecord {
        CountryRecord {
            raw_id: Some("818".into()),
            id: foundation::CountryId::normalize("818"),
            name: name.into(),
            fact: fact.map(str::to_string),
            base_color: Rgb::new(0, 0, 0),
        }
    }

    fn stay(city: &str, period: &str, description: &str) -> LivedRecord {
        LivedRecord::from_input(&LivedRecordInput {
            cities: vec![city.into()],
            period: period.into(),
            description: description.into(),
            ..LivedRecordInput::default()
        })
    }

    #[test]
    fn fact_only_in_explorer_and_when_distinct() {
        let r = record("Egypt", Some("Pyramids"));
        assert_eq!(TooltipContent::build(&r, ViewMode::Explorer, &[]).fact.as_deref(), Some("Pyramids"));
        assert_eq!(TooltipContent::build(&r, ViewMode::Visited, &[]).fact, None);
        let same = record("Egypt", Some("Egypt"));
        assert_eq!(TooltipContent::build(&same, ViewMode::Explorer, &[]).fact, None);
    }

    #[test]
    fn lived_entries_only_in_lived_view() {
        let r = record("Egypt", None);
        let stays = [stay("Cairo", "Jan 2022 → Mar 2023", "Work"), stay("Luxor", "2019", "")];
        assert!(TooltipContent::build(&r, ViewMode::Explorer, &stays).lived.is_empty());

        let t = TooltipContent::build(&r, ViewMode::Lived, &stays);
        assert_eq!(t.lived.len(), 2);
        assert_eq!(t.total.as_deref(), Some("1 year, 8 weeks"));
        assert_eq!(
            t.to_html(),
            "<span class=\"country-tooltip__title\">Egypt</span>\
             <span class=\"country-tooltip__section-title\">Lived here</span>\
             <span class=\"country-tooltip__total\">Total: 1 year, 8 weeks</span>\
             <span class=\"country-tooltip__lived-entry\">Work — <strong class=\"country-tooltip__city\">Cairo</strong> · 2022 → 2023 (1 year, 8 weeks)</span>\
             <span class=\"country-tooltip__lived-entry\"><strong class=\"country-tooltip__city\">Luxor</strong> · 2019</span>"
        );
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
        let t = TooltipContent::build(&record("<script>", None), ViewMode::Explorer, &[]);
        assert_eq!(t.to_html(), "<span class=\"country-tooltip__title\">&lt;script&gt;</span>");
    }

    #[test]
    fn tooltip_sits_above_right_of_pointer() {
        assert_eq!(tooltip_position(100.0, 100.0), [116.0, 72.0]);
    }
}
