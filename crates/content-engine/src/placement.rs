//! 分级测评
//!
//! 根据前测得分确定学生在模块中的起始难度。

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::models::Difficulty;

/// 进入 high 级别的最低分
pub const HIGH_THRESHOLD: i32 = 80;
/// 进入 medium 级别的最低分
pub const MEDIUM_THRESHOLD: i32 = 60;

/// 测评结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementResult {
    pub score: i32,
    pub correct: usize,
    pub total: usize,
    pub level: Difficulty,
}

impl PlacementResult {
    pub fn evaluate(correct: usize, total: usize) -> Self {
        let score = score_percent(correct, total);
        Self {
            score,
            correct,
            total,
            level: level_for_score(score),
        }
    }
}

/// 百分制得分，四舍五入；没有题目时为 0
pub fn score_percent(correct: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as i32
}

/// 得分对应的难度
pub fn level_for_score(score: i32) -> Difficulty {
    if score >= HIGH_THRESHOLD {
        Difficulty::High
    } else if score >= MEDIUM_THRESHOLD {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

/// 判断作答是否正确：忽略首尾空白与大小写
pub fn answers_match(expected: &str, given: &str) -> bool {
    let expected = expected.trim();
    !expected.is_empty() && expected.eq_ignore_ascii_case(given.trim())
}

/// 单题判分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradedAnswer<'a, K> {
    pub item_id: K,
    pub answer: &'a str,
    pub is_correct: bool,
}

/// 前测判分结果：需要记录的作答与总体定级
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PretestGrade<'a, K> {
    pub recorded: Vec<GradedAnswer<'a, K>>,
    pub result: PlacementResult,
}

/// 按模块题目的标准答案批改前测
///
/// `answer_key` 只包含本模块的题目。不在其中的题目计为答错且不记录，
/// 得分按提交的全部答案计算。
pub fn grade_pretest<'a, K>(
    answers: impl IntoIterator<Item = (K, &'a str)>,
    answer_key: &HashMap<K, Option<String>>,
) -> PretestGrade<'a, K>
where
    K: Eq + Hash,
{
    let mut total = 0;
    let mut recorded = Vec::new();

    for (item_id, answer) in answers {
        total += 1;
        if let Some(expected) = answer_key.get(&item_id) {
            let is_correct = expected
                .as_deref()
                .is_some_and(|expected| answers_match(expected, answer));
            recorded.push(GradedAnswer {
                item_id,
                answer,
                is_correct,
            });
        }
    }

    let correct = recorded.iter().filter(|g| g.is_correct).count();
    PretestGrade {
        recorded,
        result: PlacementResult::evaluate(correct, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_percent_rounds() {
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(5, 5), 100);
        assert_eq!(score_percent(0, 0), 0);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_score(80), Difficulty::High);
        assert_eq!(level_for_score(79), Difficulty::Medium);
        assert_eq!(level_for_score(60), Difficulty::Medium);
        assert_eq!(level_for_score(59), Difficulty::Easy);
        assert_eq!(level_for_score(0), Difficulty::Easy);
    }

    #[test]
    fn test_evaluate() {
        let result = PlacementResult::evaluate(4, 5);
        assert_eq!(result.score, 80);
        assert_eq!(result.level, Difficulty::High);
    }

    #[test]
    fn test_answers_match() {
        assert!(answers_match("Chlorophyll", "  chlorophyll "));
        assert!(!answers_match("Chlorophyll", "Carotene"));
        assert!(!answers_match("", ""));
    }

    fn answer_key() -> HashMap<u32, Option<String>> {
        HashMap::from([
            (1, Some("Paris".to_string())),
            (2, Some("4".to_string())),
            (3, None),
        ])
    }

    #[test]
    fn test_grade_pretest_all_known_items() {
        let grade = grade_pretest([(1, " paris "), (2, "5"), (3, "anything")], &answer_key());

        assert_eq!(grade.recorded.len(), 3);
        assert!(grade.recorded[0].is_correct);
        assert!(!grade.recorded[1].is_correct);
        // 没有标准答案的题目无法判为正确
        assert!(!grade.recorded[2].is_correct);
        assert_eq!(grade.result.correct, 1);
        assert_eq!(grade.result.total, 3);
        assert_eq!(grade.result.score, 33);
        assert_eq!(grade.result.level, Difficulty::Easy);
    }

    #[test]
    fn test_grade_pretest_unknown_items_count_as_wrong() {
        let grade = grade_pretest([(1, "Paris"), (2, "4"), (99, "Paris"), (100, "4")], &answer_key());

        let recorded: Vec<u32> = grade.recorded.iter().map(|g| g.item_id).collect();
        assert_eq!(recorded, vec![1, 2]);
        assert_eq!(grade.result.correct, 2);
        assert_eq!(grade.result.total, 4);
        assert_eq!(grade.result.score, 50);
    }

    #[test]
    fn test_grade_pretest_empty() {
        let grade = grade_pretest(std::iter::empty::<(u32, &str)>(), &answer_key());
        assert!(grade.recorded.is_empty());
        assert_eq!(grade.result.score, 0);
        assert_eq!(grade.result.level, Difficulty::Easy);
    }
}
