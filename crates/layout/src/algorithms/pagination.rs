pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Checks whether a child of `child_height` fits between `cursor_y` and the
/// frame's lower limit `limit_y`. An infinite limit never breaks.
pub fn check_child_fit(cursor_y: f32, child_height: f32, limit_y: f32) -> BreakAnalysis {
    let available = (limit_y - cursor_y).max(0.0);
    // Use a small epsilon to handle floating point inaccuracies
    const EPSILON: f32 = 0.01;
    BreakAnalysis {
        should_break: child_height > available + EPSILON,
        remaining_height: available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_does_not_break() {
        let analysis = check_child_fit(700.0, 61.89, 761.89);
        assert!(!analysis.should_break);
        assert!(check_child_fit(700.0, 62.0, 761.89).should_break);
    }

    #[test]
    fn cursor_past_limit_leaves_no_room() {
        let analysis = check_child_fit(800.0, 1.0, 761.89);
        assert!(analysis.should_break);
        assert_eq!(analysis.remaining_height, 0.0);
        assert!(!check_child_fit(800.0, 1.0e6, f32::INFINITY).should_break);
    }
}
