use crate::error::ScheduleError;

/// Largest total a goal column can hold.
pub const MAX_GOAL_HOURS: f64 = u32::MAX as f64;

/// Cumulative whole-hour goals for `milestone_count` equally weighted
/// milestones sharing `total_hours`.
///
/// Entry `k` (1-based) is `ceil(total_hours * k / milestone_count)`. The
/// sequence is non-decreasing and its last entry is exactly
/// `ceil(total_hours)`.
///
/// Totals whose ceiling does not fit a `u32` goal are rejected.
pub fn generate_schedule(
    total_hours: f64,
    milestone_count: usize,
) -> Result<Vec<u32>, ScheduleError> {
    if milestone_count == 0 {
        return Err(ScheduleError::NoMilestones);
    }
    let in_range =
        total_hours.is_finite() && total_hours > 0.0 && total_hours.ceil() <= MAX_GOAL_HOURS;
    if !in_range {
        return Err(ScheduleError::InvalidTotalHours(total_hours));
    }

    let n = milestone_count as f64;
    let goals = (1..=milestone_count)
        .map(|k| {
            // Pin the last checkpoint so rounding can't overshoot the total.
            let cumulative = if k == milestone_count {
                total_hours
            } else {
                total_hours * k as f64 / n
            };
            cumulative.ceil() as u32
        })
        .collect();

    Ok(goals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_split_rounds_up() {
        assert_eq!(generate_schedule(10.0, 4).unwrap(), vec![3, 5, 8, 10]);
    }

    #[test]
    fn single_milestone_gets_everything() {
        assert_eq!(generate_schedule(7.0, 1).unwrap(), vec![7]);
    }

    #[test]
    fn fractional_total_ends_on_its_ceiling() {
        assert_eq!(generate_schedule(2.5, 2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn more_milestones_than_hours() {
        assert_eq!(generate_schedule(2.0, 5).unwrap(), vec![1, 1, 2, 2, 2]);
    }

    #[test]
    fn non_decreasing_and_ends_on_ceiling() {
        let totals = [0.1, 0.5, 1.0, 2.5, 3.3, 7.0, 9.99, 10.0, 12.75, 40.0, 100.1, 1234.5];
        for &total in &totals {
            for count in 1..=64 {
                let goals = generate_schedule(total, count).unwrap();
                assert_eq!(goals.len(), count);
                assert!(
                    goals.windows(2).all(|w| w[0] <= w[1]),
                    "not monotonic for {total}/{count}: {goals:?}"
                );
                assert_eq!(
                    *goals.last().unwrap(),
                    total.ceil() as u32,
                    "wrong final goal for {total}/{count}"
                );
            }
        }
    }

    #[test]
    fn total_at_goal_ceiling_is_kept_exactly() {
        let goals = generate_schedule(MAX_GOAL_HOURS, 2).unwrap();
        assert_eq!(goals, vec![u32::MAX / 2 + 1, u32::MAX]);
    }

    #[test]
    fn total_past_goal_ceiling_rejected() {
        assert_eq!(
            generate_schedule(5.0e9, 2),
            Err(ScheduleError::InvalidTotalHours(5.0e9))
        );
        assert!(matches!(
            generate_schedule(MAX_GOAL_HOURS + 0.5, 3),
            Err(ScheduleError::InvalidTotalHours(_))
        ));
    }

    #[test]
    fn zero_milestones_rejected() {
        assert_eq!(generate_schedule(10.0, 0), Err(ScheduleError::NoMilestones));
    }

    #[test]
    fn non_positive_hours_rejected() {
        assert_eq!(
            generate_schedule(0.0, 3),
            Err(ScheduleError::InvalidTotalHours(0.0))
        );
        assert!(matches!(
            generate_schedule(-4.0, 3),
            Err(ScheduleError::InvalidTotalHours(_))
        ));
        assert!(matches!(
            generate_schedule(f64::NAN, 3),
            Err(ScheduleError::InvalidTotalHours(_))
        ));
    }
}
