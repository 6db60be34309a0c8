use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{QuestionBank, WeekQuestion};

/// Default number of questions drawn for the exam.
pub const EXAM_SAMPLE_SIZE: usize = 30;

/// Pools every question of every week, in week order, tagging each with the
/// week it came from.
#[must_use]
pub fn pool_questions(bank: &QuestionBank) -> Vec<WeekQuestion> {
    bank.iter()
        .flat_map(|(week, questions)| {
            questions.iter().map(|q| WeekQuestion {
                week: *week,
                question: q.clone(),
            })
        })
        .collect()
}

/// Draws up to `count` pooled questions uniformly, without replacement.
///
/// Smaller pools are returned whole, shuffled.
pub fn sample_questions<R>(bank: &QuestionBank, count: usize, rng: &mut R) -> Vec<WeekQuestion>
where
    R: Rng + ?Sized,
{
    let mut pool = pool_questions(bank);
    pool.as_mut_slice().shuffle(rng);
    pool.truncate(count);
    pool
}
