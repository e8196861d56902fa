use std::cmp::Ordering;

use crate::openalex::{GroupCount, RawAuthor};
use crate::util::truncate_label;

pub const BAR_HEIGHT: f32 = 25.0;
pub const BAR_SPACING: f32 = 10.0;
pub const BAR_LABEL_CHARS: usize = 35;
pub const AXIS_TICKS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f32, f32),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// `[0, max]` of the values, the usual domain for counts.
    pub fn from_zero<I>(values: I, range: (f32, f32)) -> Self
    where
        I: IntoIterator<Item = f32>,
    {
        let max = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(0.0_f32, f32::max);
        Self::new((0.0, max), range)
    }

    pub fn map(&self, value: f32) -> f32 {
        let span = self.domain.1 - self.domain.0;
        if span.abs() <= f32::EPSILON {
            return self.range.0;
        }
        let t = (value - self.domain.0) / span;
        self.range.0 + (self.range.1 - self.range.0) * t
    }

    /// Round tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        let (start, stop) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if !(start.is_finite() && stop.is_finite()) || count == 0 {
            return Vec::new();
        }
        if (stop - start).abs() <= f32::EPSILON {
            return vec![start];
        }

        let step = nice_step(start as f64, stop as f64, count);
        let first = (start as f64 / step).ceil() as i64;
        let last = (stop as f64 / step).floor() as i64;
        (first..=last).map(|index| (index as f64 * step) as f32).collect()
    }
}

fn nice_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count as f64;
    let power = raw.log10().floor();
    let magnitude = 10f64.powf(power);
    let error = raw / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

pub fn format_tick(value: f32) -> String {
    if value.abs() >= 1_000.0 && value.fract() == 0.0 {
        crate::util::format_count(value.abs() as u64)
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub full_label: String,
    pub count: u64,
}

/// Institutions sorted by count, largest first; ties keep their fetched order.
pub fn institution_bars(groups: &[GroupCount]) -> Vec<Bar> {
    let mut bars = groups
        .iter()
        .map(|group| {
            let name = if group.key_display_name.is_empty() {
                group.key.as_str()
            } else {
                group.key_display_name.as_str()
            };
            Bar {
                label: truncate_label(name, BAR_LABEL_CHARS),
                full_label: name.to_owned(),
                count: group.count,
            }
        })
        .collect::<Vec<_>>();
    bars.sort_by(|a, b| b.count.cmp(&a.count));
    bars
}

pub fn bars_height(count: usize) -> f32 {
    count as f32 * (BAR_HEIGHT + BAR_SPACING)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterPoint {
    pub label: String,
    pub works: u64,
    pub citations: u64,
}

pub fn author_points(authors: &[RawAuthor]) -> Vec<ScatterPoint> {
    authors
        .iter()
        .map(|author| ScatterPoint {
            label: author.display_name.clone(),
            works: author.works_count,
            citations: author.cited_by_count,
        })
        .collect()
}

/// Index of the point closest to `target` within `max_distance`, in screen units.
pub fn nearest_point<I>(points: I, target: (f32, f32), max_distance: f32) -> Option<usize>
where
    I: IntoIterator<Item = (f32, f32)>,
{
    points
        .into_iter()
        .enumerate()
        .map(|(index, (x, y))| {
            let distance = ((x - target.0).powi(2) + (y - target.1).powi(2)).sqrt();
            (index, distance)
        })
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map(|(index, _)| index)
}
