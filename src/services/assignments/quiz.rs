//! 测验题目校验与自动评分

use std::collections::HashMap;

use crate::models::assignments::{
    entities::{AssignmentKind, GradedAnswer, Question},
    requests::{AnswerItem, CreateAssignmentRequest},
    responses::QuizResult,
};
use crate::services::round2;
use crate::services::topics::validate_title;

/// 测验满分，自动评分结果在 0 到该值之间
pub const QUIZ_MAX_SCORE: f64 = 100.0;

/// 校验新作业
///
/// 测验至少一题，每题至少两个选项且恰好一个正确，满分只能是 100；问答不能带题目。
pub fn validate_assignment(req: &CreateAssignmentRequest) -> Result<(), String> {
    validate_title(&req.title).map_err(str::to_string)?;

    if let Some(max_score) = req.max_score
        && !(max_score.is_finite() && max_score > 0.0)
    {
        return Err("max_score must be positive".to_string());
    }

    match req.kind {
        AssignmentKind::Essay => {
            if !req.questions.is_empty() {
                return Err("Essay assignments cannot carry questions".to_string());
            }
        }
        AssignmentKind::Quiz => {
            if req.max_score.is_some_and(|max_score| max_score != QUIZ_MAX_SCORE) {
                return Err(format!("A quiz is always scored out of {QUIZ_MAX_SCORE}"));
            }
            if req.questions.is_empty() {
                return Err("A quiz needs at least one question".to_string());
            }
            for (index, question) in req.questions.iter().enumerate() {
                let number = index + 1;
                if question.prompt.trim().is_empty() {
                    return Err(format!("Question {number} has an empty prompt"));
                }
                if question.options.len() < 2 {
                    return Err(format!("Question {number} needs at least two options"));
                }
                if question.options.iter().any(|o| o.label.trim().is_empty()) {
                    return Err(format!("Question {number} has an empty option"));
                }
                let correct = question.options.iter().filter(|o| o.is_correct).count();
                if correct != 1 {
                    return Err(format!(
                        "Question {number} must have exactly one correct option"
                    ));
                }
            }
        }
    }
    Ok(())
}

/// 对测验答案评分
///
/// `questions` 必须包含 `is_correct`。未作答或答案为空的题目计为错误。
pub fn grade_quiz(
    questions: &[Question],
    answers: &[AnswerItem],
) -> Result<(QuizResult, Vec<GradedAnswer>), String> {
    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let mut chosen: HashMap<i64, Option<i64>> = HashMap::with_capacity(answers.len());
    for answer in answers {
        let Some(question) = by_id.get(&answer.question_id) else {
            return Err(format!(
                "Question {} does not belong to this quiz",
                answer.question_id
            ));
        };
        if let Some(option_id) = answer.option_id
            && !question.options.iter().any(|o| o.id == option_id)
        {
            return Err(format!(
                "Option {} does not belong to question {}",
                option_id, question.id
            ));
        }
        if chosen.insert(answer.question_id, answer.option_id).is_some() {
            return Err(format!("Question {} answered twice", answer.question_id));
        }
    }

    let graded: Vec<GradedAnswer> = questions
        .iter()
        .map(|question| {
            let option_id = chosen.get(&question.id).copied().flatten();
            let is_correct = option_id.is_some_and(|id| {
                question
                    .options
                    .iter()
                    .any(|o| o.id == id && o.is_correct == Some(true))
            });
            GradedAnswer {
                question_id: question.id,
                option_id,
                is_correct,
            }
        })
        .collect();

    let total = questions.len();
    let correct = graded.iter().filter(|a| a.is_correct).count();
    let score = if total == 0 {
        0.0
    } else {
        round2(correct as f64 / total as f64 * QUIZ_MAX_SCORE)
    };

    Ok((
        QuizResult {
            correct,
            total,
            score,
        },
        graded,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::submissions::grade::check_score;
    use crate::models::assignments::{
        entities::QuestionOption,
        requests::{NewOption, NewQuestion},
    };

    fn question(id: i64, correct_option: i64, options: &[i64]) -> Question {
        Question {
            id,
            assignment_id: 1,
            prompt: format!("Soal {id}"),
            order_index: id as i32,
            options: options
                .iter()
                .map(|&option_id| QuestionOption {
                    id: option_id,
                    question_id: id,
                    label: format!("Pilihan {option_id}"),
                    is_correct: Some(option_id == correct_option),
                })
                .collect(),
        }
    }

    fn answer(question_id: i64, option_id: Option<i64>) -> AnswerItem {
        AnswerItem {
            question_id,
            option_id,
        }
    }

    fn quiz_request(questions: Vec<NewQuestion>) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: "Kuis Bab 1".to_string(),
            description: None,
            kind: AssignmentKind::Quiz,
            max_score: None,
            deadline: None,
            questions,
        }
    }

    fn new_question(correct: &[bool]) -> NewQuestion {
        NewQuestion {
            prompt: "2 + 2 = ?".to_string(),
            options: correct
                .iter()
                .enumerate()
                .map(|(i, &is_correct)| NewOption {
                    label: format!("{i}"),
                    is_correct,
                })
                .collect(),
        }
    }

    #[test]
    fn test_all_correct_scores_100() {
        let questions = vec![question(1, 11, &[11, 12]), question(2, 22, &[21, 22])];
        let answers = vec![answer(1, Some(11)), answer(2, Some(22))];
        let (result, graded) = grade_quiz(&questions, &answers).unwrap();
        assert_eq!(result.correct, 2);
        assert_eq!(result.total, 2);
        assert_eq!(result.score, 100.0);
        assert!(graded.iter().all(|a| a.is_correct));
    }

    #[test]
    fn test_missing_and_null_answers_are_wrong() {
        let questions = vec![
            question(1, 11, &[11, 12]),
            question(2, 22, &[21, 22]),
            question(3, 31, &[31, 32]),
        ];
        let answers = vec![answer(1, Some(11)), answer(2, None)];
        let (result, graded) = grade_quiz(&questions, &answers).unwrap();
        assert_eq!(result.correct, 1);
        assert_eq!(result.total, 3);
        assert_eq!(result.score, 33.33);
        assert_eq!(graded.len(), 3);
        assert_eq!(graded[2].option_id, None);
        assert!(!graded[2].is_correct);
    }

    #[test]
    fn test_zero_questions_score_zero() {
        let (result, graded) = grade_quiz(&[], &[]).unwrap();
        assert_eq!(result.score, 0.0);
        assert!(graded.is_empty());
    }

    #[test]
    fn test_foreign_option_or_question_rejected() {
        let questions = vec![question(1, 11, &[11, 12]), question(2, 22, &[21, 22])];
        assert!(grade_quiz(&questions, &[answer(1, Some(21))]).is_err());
        assert!(grade_quiz(&questions, &[answer(9, Some(11))]).is_err());
        assert!(grade_quiz(&questions, &[answer(1, Some(11)), answer(1, Some(12))]).is_err());
    }

    #[test]
    fn test_validate_quiz_shape() {
        assert!(validate_assignment(&quiz_request(vec![new_question(&[true, false])])).is_ok());
        assert!(validate_assignment(&quiz_request(vec![])).is_err());
        assert!(validate_assignment(&quiz_request(vec![new_question(&[true])])).is_err());
        assert!(validate_assignment(&quiz_request(vec![new_question(&[true, true])])).is_err());
        assert!(validate_assignment(&quiz_request(vec![new_question(&[false, false])])).is_err());
    }

    #[test]
    fn test_quiz_max_score_is_fixed() {
        let mut req = quiz_request(vec![new_question(&[true, false])]);
        req.max_score = Some(10.0);
        assert!(validate_assignment(&req).is_err());
        req.max_score = Some(QUIZ_MAX_SCORE);
        assert!(validate_assignment(&req).is_ok());

        // 全对的自动评分不超过满分
        let questions = vec![question(1, 11, &[11, 12])];
        let (result, _) = grade_quiz(&questions, &[answer(1, Some(11))]).unwrap();
        assert_eq!(result.score, QUIZ_MAX_SCORE);
        assert!(check_score(result.score, QUIZ_MAX_SCORE).is_ok());
    }

    #[test]
    fn test_essay_cannot_carry_questions() {
        let mut req = quiz_request(vec![new_question(&[true, false])]);
        req.kind = AssignmentKind::Essay;
        assert!(validate_assignment(&req).is_err());
        req.questions.clear();
        assert!(validate_assignment(&req).is_ok());
        req.max_score = Some(0.0);
        assert!(validate_assignment(&req).is_err());
    }
}
