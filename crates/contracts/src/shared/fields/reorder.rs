//! Pure drag-reorder step, independent of any rendering concern

/// Move `dragged` to `target_index` within `order`.
///
/// The removal shifts everything after the old position left, so when the
/// old position precedes the target the target is decremented once to
/// compensate. The index is clamped afterwards. Returns the input
/// unchanged when `dragged` is absent or already at `target_index`.
/// Never drops or duplicates entries and is idempotent under repeated
/// identical calls.
pub fn move_field(order: &[String], dragged: &str, target_index: usize) -> Vec<String> {
    let Some(pos) = order.iter().position(|n| n == dragged) else {
        return order.to_vec();
    };
    if pos == target_index {
        return order.to_vec();
    }

    let mut result = order.to_vec();
    result.remove(pos);

    let mut idx = target_index;
    if pos < idx {
        idx -= 1;
    }
    if idx > result.len() {
        idx = result.len();
    }
    result.insert(idx, dragged.to_string());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_drag_to_front() {
        let result = move_field(&order(&["c", "a", "b"]), "a", 0);
        assert_eq!(result, order(&["a", "c", "b"]));
    }

    #[test]
    fn test_drag_towards_end_compensates_removal() {
        let result = move_field(&order(&["a", "b", "c", "d"]), "a", 3);
        assert_eq!(result, order(&["b", "c", "a", "d"]));
    }

    #[test]
    fn test_drag_past_end_clamps() {
        let result = move_field(&order(&["a", "b", "c"]), "a", 99);
        assert_eq!(result, order(&["b", "c", "a"]));
    }

    #[test]
    fn test_absent_name_is_noop() {
        let input = order(&["a", "b"]);
        assert_eq!(move_field(&input, "ghost", 0), input);
    }

    #[test]
    fn test_same_index_is_noop() {
        let input = order(&["a", "b", "c"]);
        assert_eq!(move_field(&input, "b", 1), input);
    }

    #[test]
    fn test_no_loss_no_duplication_over_all_targets() {
        let input = order(&["a", "b", "c", "d", "e"]);
        for name in &input {
            for target in 0..=input.len() + 1 {
                let moved = move_field(&input, name, target);
                assert_eq!(moved.len(), input.len());
                let mut sorted = moved.clone();
                sorted.sort();
                let mut expected = input.clone();
                expected.sort();
                assert_eq!(sorted, expected, "move {} -> {}", name, target);
            }
        }
    }

    #[test]
    fn test_idempotent_under_repeated_calls() {
        let input = order(&["a", "b", "c", "d"]);
        for name in &input {
            for target in 0..=input.len() {
                let once = move_field(&input, name, target);
                let new_pos = once.iter().position(|n| n == name).unwrap();
                let twice = move_field(&once, name, new_pos);
                assert_eq!(once, twice);
                // repeating the original call verbatim must also settle
                let same_args = move_field(&once, name, target);
                assert_eq!(once, same_args);
            }
        }
    }
}
