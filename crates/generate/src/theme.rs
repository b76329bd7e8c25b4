//! Named color themes.

/// Colors as `RRGGBB` hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub accent: &'static str,
}

pub const THEMES: &[Theme] = &[
    Theme {
        name: "midnight_executive",
        background: "0F1419",
        title: "FFFFFF",
        body: "E6EDF3",
        accent: "58A6FF",
    },
    Theme {
        name: "forest_moss",
        background: "1A2F1A",
        title: "E8F5E9",
        body: "C8E6C9",
        accent: "4CAF50",
    },
    Theme {
        name: "ocean_gradient",
        background: "0D1B2A",
        title: "FFFFFF",
        body: "E0E1DD",
        accent: "415A77",
    },
    Theme {
        name: "sunset_warm",
        background: "2D1B0E",
        title: "FFF8E7",
        body: "FFE4C4",
        accent: "E07C5C",
    },
    Theme {
        name: "slate_minimal",
        background: "1E293B",
        title: "F8FAFC",
        body: "CBD5E1",
        accent: "64748B",
    },
    Theme {
        name: "emerald_pro",
        background: "022C22",
        title: "ECFDF5",
        body: "A7F3D0",
        accent: "10B981",
    },
];

impl Theme {
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        THEMES.iter().find(|theme| theme.name == name)
    }
}
