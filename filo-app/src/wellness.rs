//! The dashboard wellness index.

use crate::checkin::DailyLog;

/// Score the logged week on a 0-100 scale.
///
/// Each day contributes `5 - stress` (so a calm day is worth 4), averaged
/// and scaled by 20. No logs yet reads as a neutral 70.
pub fn wellness_index(logs: &[DailyLog]) -> u8 {
    if logs.is_empty() {
        return 70;
    }
    let total: f64 = logs.iter().map(|log| 5.0 - f64::from(log.stress_level)).sum();
    let scaled = (total / logs.len() as f64) * 20.0;
    scaled.floor().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_logs_reads_neutral() {
        assert_eq!(wellness_index(&[]), 70);
    }

    #[test]
    fn test_calm_week_scores_high() {
        let logs = vec![DailyLog::new("Mon", "Great", 1), DailyLog::new("Tue", "Great", 1)];
        assert_eq!(wellness_index(&logs), 80);
    }

    #[test]
    fn test_stressful_week_scores_low() {
        let logs = vec![DailyLog::new("Mon", "Bad", 5), DailyLog::new("Tue", "Bad", 4)];
        // (0 + 1) / 2 * 20 = 10
        assert_eq!(wellness_index(&logs), 10);
    }

    #[test]
    fn test_mixed_week_floors() {
        let logs = vec![
            DailyLog::new("Mon", "Good", 2),
            DailyLog::new("Tue", "Okay", 3),
            DailyLog::new("Wed", "Great", 1),
        ];
        // (3 + 2 + 4) / 3 * 20 = 60
        assert_eq!(wellness_index(&logs), 60);
    }

    #[test]
    fn test_score_is_capped() {
        let logs = vec![DailyLog::new("Mon", "Zen", 0)];
        assert_eq!(wellness_index(&logs), 100);
    }
}
