//! Decides whether the interview moves past the current question.

use super::audit::AuditVerdict;
use super::session::SessionState;

/// Returns true if the interview should leave `question`.
///
/// The final question only closes once all of its follow-ups are covered; the
/// verdict, tags and skip flag are ignored there. Any other question advances
/// on `ALLOW_NEXT_QUESTION`, a fast-forward tag, or a skip, and coverage is
/// not consulted.
pub fn should_advance<F>(
    verdict: &AuditVerdict,
    state: &SessionState,
    question: usize,
    is_final_question: bool,
    all_followups_covered: F,
) -> bool
where
    F: Fn(usize) -> bool,
{
    if is_final_question {
        return all_followups_covered(question);
    }

    verdict.allows_next() || state.tags_fast_forward() || state.is_skipped(question)
}
