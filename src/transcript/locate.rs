//! Map the playback clock to the line currently being spoken.

use super::types::TranscriptLine;

/// Return the index of the first line whose interval contains `current_time`,
/// using half-open semantics: `start <= t < end`. Returns `None` before the
/// first line, after the last, or inside a timestamp gap between lines.
///
/// A zero-width line (`start == end`) can never match; raw provider
/// timestamps produce these occasionally and they are left as-is.
pub fn find_active_line(current_time: f64, lines: &[TranscriptLine]) -> Option<usize> {
    lines
        .iter()
        .position(|line| current_time >= line.start && current_time < line.end)
}

/// Incremental locator for per-tick queries. Caches the last answer together
/// with the time window in which the scan provably returns that same answer,
/// so consecutive ticks on one line cost a single range check. Lines may
/// overlap or leave gaps; results are always identical to
/// [`find_active_line`].
#[derive(Debug, Default)]
pub struct LineCursor {
    // (window_start, window_end, answer): for any t in [window_start,
    // window_end) the linear scan yields `answer`.
    window: Option<(f64, f64, Option<usize>)>,
}

impl LineCursor {
    pub const fn new() -> Self {
        Self { window: None }
    }

    /// Forget the cached window. Call when the line set is replaced.
    pub fn reset(&mut self) {
        self.window = None;
    }

    pub fn locate(&mut self, current_time: f64, lines: &[TranscriptLine]) -> Option<usize> {
        if let Some((lo, hi, answer)) = self.window {
            if current_time >= lo && current_time < hi {
                return answer;
            }
        }

        // Full scan, narrowing the window around `current_time` in which
        // every comparison made here comes out the same way: a line already
        // passed keeps failing while t stays below its start or at/above its
        // end, and the matched line keeps matching inside its own interval.
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;
        let mut answer = None;
        for (i, line) in lines.iter().enumerate() {
            if current_time >= line.start && current_time < line.end {
                lo = lo.max(line.start);
                hi = hi.min(line.end);
                answer = Some(i);
                break;
            }
            if current_time < line.start {
                hi = hi.min(line.start);
            } else {
                lo = lo.max(line.end);
            }
        }
        self.window = Some((lo, hi, answer));
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(start: f64, end: f64) -> TranscriptLine {
        TranscriptLine {
            text: String::new(),
            start,
            end,
            word_range: (0, 0),
        }
    }

    #[test]
    fn matches_half_open_interval() {
        let lines = vec![line(0.0, 5.0), line(5.0, 10.0)];
        assert_eq!(find_active_line(0.0, &lines), Some(0));
        assert_eq!(find_active_line(4.999, &lines), Some(0));
        // Shared boundary belongs to the next line, never the previous one.
        assert_eq!(find_active_line(5.0, &lines), Some(1));
        assert_eq!(find_active_line(10.0, &lines), None);
    }

    #[test]
    fn none_outside_and_in_gaps() {
        let lines = vec![line(0.0, 5.0), line(7.0, 10.0)];
        assert_eq!(find_active_line(-1.0, &lines), None);
        assert_eq!(find_active_line(6.0, &lines), None);
        assert_eq!(find_active_line(11.0, &lines), None);
        assert_eq!(find_active_line(0.0, &[]), None);
    }

    #[test]
    fn zero_width_line_never_matches() {
        let lines = vec![line(0.0, 2.0), line(2.0, 2.0), line(2.0, 4.0)];
        assert_eq!(find_active_line(2.0, &lines), Some(2));
    }

    #[test]
    fn returns_first_match_on_overlap() {
        let lines = vec![line(0.0, 6.0), line(4.0, 10.0)];
        assert_eq!(find_active_line(5.0, &lines), Some(0));
        assert_eq!(find_active_line(7.0, &lines), Some(1));
    }

    #[test]
    fn cursor_agrees_with_linear_scan() {
        let lines = vec![
            line(0.0, 2.0),
            line(2.0, 4.0),
            line(4.5, 6.0),
            line(6.0, 6.0),
            line(6.0, 9.0),
        ];
        let mut cursor = LineCursor::new();
        // Forward playback, a gap, a backward seek, a forward seek.
        let times = [
            0.0, 0.5, 1.9, 2.0, 3.0, 4.0, 4.2, 4.5, 5.9, 6.0, 8.5, 1.0, 7.0, 0.0, 9.0,
        ];
        for t in times {
            assert_eq!(
                cursor.locate(t, &lines),
                find_active_line(t, &lines),
                "t={}",
                t
            );
        }
    }

    #[test]
    fn cursor_agrees_with_linear_scan_on_overlapping_lines() {
        // Raw word timestamps can overlap, including a long early line that
        // spans later ones entirely.
        let lines = vec![
            line(0.0, 6.0),
            line(4.0, 10.0),
            line(8.0, 8.5),
            line(0.0, 12.0),
            line(11.0, 13.0),
        ];
        let mut cursor = LineCursor::new();
        // Seeks landing inside each overlap region, in both directions, after
        // the cursor has been seeded elsewhere.
        let times = [
            7.0, 5.0, 4.0, 3.9, 8.2, 5.5, 9.9, 10.0, 11.5, 12.5, 6.0, 0.0, 13.0,
        ];
        for t in times {
            assert_eq!(
                cursor.locate(t, &lines),
                find_active_line(t, &lines),
                "t={}",
                t
            );
        }
    }

    #[test]
    fn cursor_prefers_first_line_inside_overlap() {
        let lines = vec![line(0.0, 6.0), line(4.0, 10.0)];
        let mut cursor = LineCursor::new();
        // Seed the cache on the later line, then seek back into the overlap:
        // the earlier line must win, exactly as in the linear scan.
        assert_eq!(cursor.locate(7.0, &lines), Some(1));
        assert_eq!(cursor.locate(5.0, &lines), Some(0));
        assert_eq!(cursor.locate(5.9, &lines), Some(0));
        assert_eq!(cursor.locate(6.0, &lines), Some(1));
    }

    #[test]
    fn cursor_reset_survives_line_replacement() {
        let first = vec![line(0.0, 100.0)];
        let second = vec![line(0.0, 1.0)];
        let mut cursor = LineCursor::new();
        assert_eq!(cursor.locate(50.0, &first), Some(0));
        cursor.reset();
        assert_eq!(cursor.locate(50.0, &second), None);
        assert_eq!(cursor.locate(0.5, &second), Some(0));
    }
}
