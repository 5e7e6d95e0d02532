use serde::{Deserialize, Serialize};

/// Fallback item count used when no breakpoint table is configured.
pub const WIDE_VIEWPORT_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub max_width: u32,
    pub count: usize,
}

impl Breakpoint {
    pub fn new(max_width: u32, count: usize) -> Self {
        Self { max_width, count }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawBreakpoints {
    #[serde(default)]
    steps: Vec<Breakpoint>,
    #[serde(default = "default_count")]
    default_count: usize,
}

fn default_count() -> usize {
    WIDE_VIEWPORT_COUNT
}

/// Maps a viewport width to how many items a carousel shows at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBreakpoints")]
pub struct Breakpoints {
    steps: Vec<Breakpoint>,
    default_count: usize,
}

impl From<RawBreakpoints> for Breakpoints {
    fn from(raw: RawBreakpoints) -> Self {
        Self::new(raw.steps, raw.default_count)
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::fixed(WIDE_VIEWPORT_COUNT)
    }
}

impl Breakpoints {
    pub fn new(mut steps: Vec<Breakpoint>, default_count: usize) -> Self {
        // narrowest first, whatever order the config listed them in
        steps.sort_by_key(|b| b.max_width);
        Self {
            steps,
            default_count,
        }
    }

    /// A table that shows the same count at every width.
    pub fn fixed(count: usize) -> Self {
        Self::new(Vec::new(), count)
    }

    pub fn steps(&self) -> &[Breakpoint] {
        &self.steps
    }

    pub fn default_count(&self) -> usize {
        self.default_count
    }

    pub fn visible_count(&self, viewport_width: u32) -> usize {
        self.steps
            .iter()
            .find(|b| b.max_width > viewport_width)
            .map_or(self.default_count, |b| b.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_table() -> Breakpoints {
        Breakpoints::new(vec![Breakpoint::new(768, 1), Breakpoint::new(1200, 2)], 3)
    }

    #[test]
    fn test_narrow_viewport_shows_one() {
        assert_eq!(site_table().visible_count(500), 1);
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        let table = site_table();
        assert_eq!(table.visible_count(767), 1);
        assert_eq!(table.visible_count(768), 2);
        assert_eq!(table.visible_count(1199), 2);
        assert_eq!(table.visible_count(1200), 3);
        assert_eq!(table.visible_count(4000), 3);
    }

    #[test]
    fn test_unsorted_steps_are_evaluated_narrowest_first() {
        let table = Breakpoints::new(vec![Breakpoint::new(1200, 2), Breakpoint::new(768, 1)], 3);
        assert_eq!(table.visible_count(500), 1);
    }

    #[test]
    fn test_deserialize_defaults() {
        let table: Breakpoints =
            serde_json::from_str(r#"{ "steps": [{ "max_width": 900, "count": 1 }] }"#).unwrap();
        assert_eq!(table.visible_count(100), 1);
        assert_eq!(table.visible_count(900), WIDE_VIEWPORT_COUNT);
    }
}
