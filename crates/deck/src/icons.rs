//! Section icon lookup.

/// Icon shown next to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionIcon {
    Users,
    CalendarDays,
    Box,
    MapPin,
    /// Fallback for sections outside the fixed categories.
    Sparkles,
}

const SECTION_ICONS: &[(&str, SectionIcon)] = &[
    ("characters", SectionIcon::Users),
    ("events", SectionIcon::CalendarDays),
    ("objects", SectionIcon::Box),
    ("places", SectionIcon::MapPin),
];

/// Returns the icon for a section ID, falling back to [`SectionIcon::Sparkles`].
pub fn section_icon(section_id: &str) -> SectionIcon {
    SECTION_ICONS
        .iter()
        .find(|(id, _)| *id == section_id)
        .map_or(SectionIcon::Sparkles, |(_, icon)| *icon)
}

impl SectionIcon {
    /// Kebab-case icon name.
    pub fn name(self) -> &'static str {
        match self {
            SectionIcon::Users => "users",
            SectionIcon::CalendarDays => "calendar-days",
            SectionIcon::Box => "box",
            SectionIcon::MapPin => "map-pin",
            SectionIcon::Sparkles => "sparkles",
        }
    }
}
