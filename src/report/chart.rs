/// Full length of a bar's track in millimetres.
pub const TRACK_WIDTH: f32 = 150.0;
/// Longest label printed next to a bar.
pub const LABEL_BUDGET: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub label: String,
    pub count: usize,
    pub track_width: f32,
    pub fill_width: f32,
}

/// Sizes one bar relative to the largest count in the chart.
pub fn bar(label: &str, count: usize, max_count: usize) -> BarGeometry {
    let fill_width = if max_count == 0 {
        0.0
    } else {
        count as f32 / max_count as f32 * TRACK_WIDTH
    };
    BarGeometry {
        label: truncate(label, LABEL_BUDGET),
        count,
        track_width: TRACK_WIDTH,
        fill_width,
    }
}

pub fn bars<'a, I>(entries: I, max_count: usize) -> Vec<BarGeometry>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    entries
        .into_iter()
        .map(|(label, count)| bar(label, count, max_count))
        .collect()
}

/// Cuts `text` to `budget` characters, ending in `...` when shortened.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let keep = budget.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_the_largest_count() {
        let bars = bars([("A", 3), ("B", 1), ("C", 0)], 3);
        assert_eq!(bars[0].fill_width, TRACK_WIDTH);
        assert!((bars[1].fill_width - 50.0).abs() < 1e-4);
        assert_eq!(bars[2].fill_width, 0.0);
        assert!(bars.iter().all(|b| b.track_width == TRACK_WIDTH));
    }

    #[test]
    fn zero_max_draws_empty_bars() {
        assert_eq!(bar("A", 0, 0).fill_width, 0.0);
    }

    #[test]
    fn long_labels_are_truncated() {
        let label = "Recomendação de um amigo que mora em Ciudad del Este";
        let geometry = bar(label, 1, 1);
        assert_eq!(geometry.label.chars().count(), LABEL_BUDGET);
        assert!(geometry.label.ends_with("..."));
        assert!(geometry.label.starts_with("Recomendação de um amigo"));

        let exact = "x".repeat(LABEL_BUDGET);
        assert_eq!(truncate(&exact, LABEL_BUDGET), exact);
    }
}
