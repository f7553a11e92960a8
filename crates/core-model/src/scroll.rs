//! Viewport arithmetic for goto-line, recenter and paging.

use core_keymap::RecenterTarget;

/// Compute the desired new first visible line to keep the cursor within the
/// vertical viewport subject to a top/bottom margin.
///
/// Returns `Some(new_first)` if a scroll is needed, else `None` when the
/// cursor is already within the permitted band. Never underflows.
pub fn compute_scroll_intent(
    first: usize,
    cursor_line: usize,
    text_height: usize,
    margin: usize,
) -> Option<usize> {
    if text_height == 0 {
        return None;
    }
    let m = margin.min(text_height / 2);
    let top = first;
    let bottom = first + text_height;
    if cursor_line < top + m {
        let new_first = cursor_line.saturating_sub(m);
        if new_first != first {
            return Some(new_first);
        }
    } else if cursor_line + m >= bottom {
        let new_first = cursor_line + m + 1 - text_height;
        if new_first != first {
            return Some(new_first);
        }
    }
    None
}

/// First visible line that puts `cursor_line` at `target`.
pub fn recenter_first_line(cursor_line: usize, text_height: usize, target: RecenterTarget) -> usize {
    match target {
        RecenterTarget::Middle => cursor_line.saturating_sub(text_height / 2),
        RecenterTarget::Top => cursor_line,
        RecenterTarget::Bottom => cursor_line.saturating_sub(text_height.saturating_sub(1)),
    }
}

/// `(cursor_line, first_line)` after one page jump. Forward lands on the line
/// just below the viewport and shows it at the top; backward lands on the top
/// line and shows it at the bottom.
pub fn page_target(
    first: usize,
    text_height: usize,
    line_count: usize,
    forward: bool,
) -> (usize, usize) {
    let last = line_count.saturating_sub(1);
    if forward {
        let target = (first + text_height).min(last);
        (target, target)
    } else {
        let target = first.min(last);
        (target, target.saturating_sub(text_height.saturating_sub(1)))
    }
}
