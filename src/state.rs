use crate::color::Rgb;
use crate::ring::RingParams;

/// One update operation per mutable ring parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum RingAction {
    SetText(String),
    SetTextColor(Rgb),
    SetTextFontSize(f64),
    SetTextStartOffset(f64),
    SetRingColor(Rgb),
    SetFadeColor(Rgb),
    SetFontFamily(String),
}

/// Pure reducer over [`RingParams`]; each action touches exactly its field.
pub fn update_ring(state: RingParams, action: RingAction) -> RingParams {
    match action {
        RingAction::SetText(text) => RingParams { text, ..state },
        RingAction::SetTextColor(text_color) => RingParams { text_color, ..state },
        RingAction::SetTextFontSize(font_size_rem) => RingParams { font_size_rem, ..state },
        RingAction::SetTextStartOffset(text_start_offset_pct) => RingParams {
            text_start_offset_pct,
            ..state
        },
        RingAction::SetRingColor(ring_color) => RingParams { ring_color, ..state },
        RingAction::SetFadeColor(fade_color) => RingParams { fade_color, ..state },
        RingAction::SetFontFamily(font_family) => RingParams { font_family, ..state },
    }
}

/// Which ring color a sampled or picked color should land on. Exactly one is
/// active at a time; selecting is plain assignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorTarget {
    #[default]
    Ring,
    Fade,
    Text,
}

impl ColorTarget {
    /// The ring update that routes `color` to this target.
    pub fn action_for(self, color: Rgb) -> RingAction {
        match self {
            ColorTarget::Ring => RingAction::SetRingColor(color),
            ColorTarget::Fade => RingAction::SetFadeColor(color),
            ColorTarget::Text => RingAction::SetTextColor(color),
        }
    }
}

/// Export lifecycle. `Pending` blocks re-entrant export triggers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportStatus {
    #[default]
    Idle,
    Pending,
    Resolved,
    Error,
}

impl ExportStatus {
    /// Whether a new export may start from this state. `Error` re-enables
    /// retry; only an in-flight export blocks.
    pub fn can_begin(self) -> bool {
        !matches!(self, ExportStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_action_updates_exactly_its_field() {
        let base = RingParams::default();

        let s = update_ring(base.clone(), RingAction::SetText("hi".into()));
        assert_eq!(s.text, "hi");
        assert_eq!(s.ring_color, base.ring_color);

        let red = Rgb::new(255, 0, 0);
        let s = update_ring(base.clone(), RingAction::SetRingColor(red));
        assert_eq!(s.ring_color, red);
        assert_eq!(s.text, base.text);

        let s = update_ring(base.clone(), RingAction::SetFadeColor(red));
        assert_eq!(s.fade_color, red);

        let s = update_ring(base.clone(), RingAction::SetTextColor(red));
        assert_eq!(s.text_color, red);

        let s = update_ring(base.clone(), RingAction::SetTextFontSize(1.5));
        assert_eq!(s.font_size_rem, 1.5);

        let s = update_ring(base.clone(), RingAction::SetTextStartOffset(40.0));
        assert_eq!(s.text_start_offset_pct, 40.0);

        let s = update_ring(base, RingAction::SetFontFamily("serif".into()));
        assert_eq!(s.font_family, "serif");
    }

    #[test]
    fn color_target_routes_to_matching_action() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!(ColorTarget::Ring.action_for(c), RingAction::SetRingColor(c));
        assert_eq!(ColorTarget::Fade.action_for(c), RingAction::SetFadeColor(c));
        assert_eq!(ColorTarget::Text.action_for(c), RingAction::SetTextColor(c));
    }

    #[test]
    fn only_pending_blocks_a_new_export() {
        assert!(ExportStatus::Idle.can_begin());
        assert!(ExportStatus::Resolved.can_begin());
        assert!(ExportStatus::Error.can_begin());
        assert!(!ExportStatus::Pending.can_begin());
    }
}
