use super::measure::FontSpec;

/// Tail triangle offsets, measured from the bubble's bottom-outer corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailStyle {
    /// How far the tip sticks out past the bubble edge
    pub reach: f32,
    /// Distance of the upper base vertex above the bubble bottom
    pub base_top: f32,
    /// Distance of the tip above the bubble bottom
    pub tip: f32,
    /// Distance of the lower base vertex above the bubble bottom
    pub base_bottom: f32,
}

/// Every metric the layout engine uses.
///
/// Two presets mirror each other: [`LayoutStyle::canvas`] for the interactive
/// view and [`LayoutStyle::export`] for the larger exported image.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStyle {
    /// Gap between a bubble and the canvas edge
    pub margin: f32,
    /// Inner padding of a bubble, all sides
    pub padding: f32,
    pub min_bubble_width: f32,
    pub max_bubble_width: f32,
    /// Line limit for approximate (character count) wrapping
    pub max_chars_per_line: usize,
    pub line_height: f32,
    pub name_height: f32,
    pub time_height: f32,
    /// Time label is lifted this far off the bubble bottom
    pub time_inset: f32,
    pub corner_radius: f32,
    pub tail: TailStyle,
    /// Space after each bubble
    pub message_gap: f32,
    /// Row advance for a service line
    pub service_height: f32,
    pub date_pill_height: f32,
    /// Horizontal padding inside the date pill, each side
    pub date_pill_padding: f32,
    /// Space after a date separator
    pub date_gap: f32,
    /// First row starts here
    pub top: f32,
    /// Extra scroll room below the last row
    pub bottom_slack: f32,
    /// Body characters shown before the ellipsis; 0 = unlimited
    pub truncate_budget: usize,

    pub body_font: FontSpec,
    pub sender_font: FontSpec,
    pub time_font: FontSpec,
    pub date_font: FontSpec,
    pub service_font: FontSpec,
}

impl LayoutStyle {
    /// Interactive view metrics
    pub fn canvas() -> Self {
        Self {
            margin: 20.,
            padding: 12.,
            min_bubble_width: 200.,
            max_bubble_width: 400.,
            max_chars_per_line: 40,
            line_height: 18.,
            name_height: 20.,
            time_height: 15.,
            time_inset: 5.,
            corner_radius: 18.,
            tail: TailStyle {
                reach: 8.,
                base_top: 15.,
                tip: 8.,
                base_bottom: 5.,
            },
            message_gap: 10.,
            service_height: 25.,
            date_pill_height: 25.,
            date_pill_padding: 10.,
            date_gap: 15.,
            top: 20.,
            bottom_slack: 50.,
            truncate_budget: 200,

            body_font: FontSpec::new(15., 400, 8.),
            sender_font: FontSpec::new(13., 700, 8.),
            time_font: FontSpec::new(12., 400, 6.),
            date_font: FontSpec::new(13., 400, 8.),
            service_font: FontSpec::new(13., 400, 7.),
        }
    }

    /// Exported image metrics
    pub fn export() -> Self {
        Self {
            margin: 50.,
            padding: 15.,
            min_bubble_width: 200.,
            max_bubble_width: 500.,
            max_chars_per_line: 50,
            line_height: 20.,
            name_height: 20.,
            time_height: 15.,
            time_inset: 5.,
            corner_radius: 18.,
            tail: TailStyle {
                reach: 8.,
                base_top: 15.,
                tip: 8.,
                base_bottom: 5.,
            },
            message_gap: 15.,
            service_height: 30.,
            date_pill_height: 24.,
            date_pill_padding: 10.,
            date_gap: 20.,
            top: 120.,
            bottom_slack: 50.,
            truncate_budget: 300,

            body_font: FontSpec::new(16., 400, 8.),
            sender_font: FontSpec::new(16., 700, 8.),
            time_font: FontSpec::new(12., 400, 6.),
            date_font: FontSpec::new(12., 400, 7.),
            service_font: FontSpec::new(12., 400, 7.),
        }
    }

    pub fn with_truncate_budget(mut self, budget: usize) -> Self {
        self.truncate_budget = budget;
        self
    }

    /// Widest text line a bubble can hold
    pub fn max_text_width(&self) -> f32 {
        (self.max_bubble_width - 2. * self.padding).max(0.)
    }

    /// Widest bubble that fits a canvas `canvas_width` pixels wide with a
    /// margin on both sides, never below `min_bubble_width`
    pub fn bubble_width_limit(&self, canvas_width: f32) -> f32 {
        self.max_bubble_width
            .min(canvas_width - 2. * self.margin)
            .max(self.min_bubble_width)
    }

    /// Wrap width for glyph measurement on a canvas `canvas_width` wide
    pub fn text_width_limit(&self, canvas_width: f32) -> f32 {
        (self.bubble_width_limit(canvas_width) - 2. * self.padding).max(0.)
    }

    /// `max_chars_per_line` scaled down with the wrap width
    pub fn chars_per_line_limit(&self, canvas_width: f32) -> usize {
        let full = self.max_text_width();
        if full <= 0. {
            return self.max_chars_per_line.max(1);
        }
        let ratio = (self.text_width_limit(canvas_width) / full).min(1.);
        ((self.max_chars_per_line as f32 * ratio).floor() as usize).max(1)
    }
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self::canvas()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_canvas_uses_full_limits() {
        let style = LayoutStyle::canvas();
        assert_eq!(style.bubble_width_limit(1200.), style.max_bubble_width);
        assert_eq!(style.text_width_limit(1200.), style.max_text_width());
        assert_eq!(style.chars_per_line_limit(1200.), style.max_chars_per_line);
    }

    #[test]
    fn test_narrow_canvas_shrinks_limits() {
        let style = LayoutStyle::canvas();
        assert_eq!(style.bubble_width_limit(360.), 320.);
        assert_eq!(style.text_width_limit(360.), 296.);
        assert_eq!(style.chars_per_line_limit(360.), 31);
    }

    #[test]
    fn test_limits_floor_at_min_bubble() {
        let style = LayoutStyle::canvas();
        assert_eq!(style.bubble_width_limit(100.), style.min_bubble_width);
        assert_eq!(
            style.text_width_limit(0.),
            style.min_bubble_width - 2. * style.padding
        );
        assert!(style.chars_per_line_limit(0.) >= 1);
    }
}
