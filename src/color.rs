use std::sync::LazyLock;

use eframe::egui::Color32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkType {
    Article,
    Book,
    Dataset,
    Preprint,
    Dissertation,
    Other,
}

impl WorkType {
    pub const ALL: [Self; 6] = [
        Self::Article,
        Self::Book,
        Self::Dataset,
        Self::Preprint,
        Self::Dissertation,
        Self::Other,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "article" => Self::Article,
            "book" | "book-chapter" => Self::Book,
            "dataset" => Self::Dataset,
            "preprint" => Self::Preprint,
            "dissertation" => Self::Dissertation,
            _ => Self::Other,
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Book => "Book / Book Chapter",
            Self::Dataset => "Dataset",
            Self::Preprint => "Preprint",
            Self::Dissertation => "Dissertation",
            Self::Other => "Others",
        }
    }

    fn hsb(self) -> (f32, f32, f32) {
        match self {
            Self::Article => (350.0, 0.8, 0.9),
            Self::Book => (225.0, 0.8, 0.85),
            Self::Dataset => (160.0, 0.8, 0.75),
            Self::Preprint => (44.0, 1.0, 1.0),
            Self::Dissertation => (280.0, 0.6, 0.95),
            Self::Other => (0.0, 0.0, 0.55),
        }
    }

    fn palette_index(self) -> usize {
        match self {
            Self::Article => 0,
            Self::Book => 1,
            Self::Dataset => 2,
            Self::Preprint => 3,
            Self::Dissertation => 4,
            Self::Other => 5,
        }
    }

    pub fn color(self) -> Color32 {
        WORK_TYPE_COLORS[self.palette_index()]
    }
}

static WORK_TYPE_COLORS: LazyLock<[Color32; 6]> = LazyLock::new(|| {
    WorkType::ALL.map(|work_type| {
        let (hue, saturation, brightness) = work_type.hsb();
        let [r, g, b] = hsb_to_rgb(hue, saturation, brightness);
        Color32::from_rgb(r, g, b)
    })
});

/// Hue in degrees, saturation and brightness in `[0, 1]`.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> [u8; 3] {
    let hue = hue.rem_euclid(360.0);
    let saturation = saturation.clamp(0.0, 1.0);
    let brightness = brightness.clamp(0.0, 1.0);

    let chroma = brightness * saturation;
    let x = chroma * (1.0 - (((hue / 60.0) % 2.0) - 1.0).abs());
    let m = brightness - chroma;

    let (r, g, b) = match hue {
        h if h < 60.0 => (chroma, x, 0.0),
        h if h < 120.0 => (x, chroma, 0.0),
        h if h < 180.0 => (0.0, chroma, x),
        h if h < 240.0 => (0.0, x, chroma),
        h if h < 300.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}
