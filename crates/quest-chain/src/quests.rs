//! Quest book: quest definitions and per-quester submission status
//!
//! Quests are identified by dense ids `0..count`. Status is tracked per
//! `(quester, quest)` pair and defaults to `Init`.
//!
//! ```text
//! Init   --submit------------->  Review
//! Init   --submit, skip_review->  Pass
//! Review --review(true)------->  Pass
//! Review --review(false)------>  Fail
//! Fail   --submit------------->  Review | Pass
//! Pass   terminal
//! ```
//!
//! Batch operations are validated in full against a local overlay before
//! any write, so a batch either applies completely or not at all. The
//! overlay makes duplicate entries inside one batch behave as if applied in
//! order: a second review of the same pair fails with "not in review", and
//! a resubmission after a skip-review pass fails with "already passed".

use quest_core::{
    Address, ConflictReason, InvalidReason, QuestFlags, QuestId, QuestStatus, Result,
};
use std::collections::HashMap;

/// One quest definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    /// Opaque details reference
    pub details: String,
    /// Behaviour flags
    pub flags: QuestFlags,
}

impl Quest {
    fn new(details: String) -> Self {
        Self {
            details,
            flags: QuestFlags::default(),
        }
    }

    /// Whether this quest counts towards completion without a pass
    pub fn is_waived(&self) -> bool {
        self.flags.optional || self.flags.paused
    }
}

/// Quest definitions plus submission status for one chain
#[derive(Debug, Clone, Default)]
pub struct QuestBook {
    quests: Vec<Quest>,
    status: HashMap<(Address, QuestId), QuestStatus>,
}

impl QuestBook {
    /// Empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of quests
    pub fn count(&self) -> u64 {
        self.quests.len() as u64
    }

    /// Quest by id
    pub fn quest(&self, quest_id: QuestId) -> Result<&Quest> {
        usize::try_from(quest_id)
            .ok()
            .and_then(|idx| self.quests.get(idx))
            .ok_or_else(|| InvalidReason::QuestNotFound.into())
    }

    /// All quests in id order
    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    /// Status of `quester` on `quest_id`
    pub fn status(&self, quester: Address, quest_id: QuestId) -> Result<QuestStatus> {
        self.quest(quest_id)?;
        Ok(self.status_unchecked(quester, quest_id))
    }

    fn status_unchecked(&self, quester: Address, quest_id: QuestId) -> QuestStatus {
        self.status
            .get(&(quester, quest_id))
            .copied()
            .unwrap_or_default()
    }

    /// Append quests; returns the id of the first new quest
    pub fn create(&mut self, details: Vec<String>) -> QuestId {
        let first_id = self.count();
        self.quests.extend(details.into_iter().map(Quest::new));
        first_id
    }

    /// Replace the details of existing quests
    pub fn edit(&mut self, quest_ids: &[QuestId], details: &[String]) -> Result<()> {
        self.check_batch(quest_ids, details.len())?;
        for (&id, detail) in quest_ids.iter().zip(details) {
            self.quests[id as usize].details = detail.clone();
        }
        Ok(())
    }

    /// Replace the flags of existing quests
    pub fn configure(&mut self, quest_ids: &[QuestId], flags: &[QuestFlags]) -> Result<()> {
        self.check_batch(quest_ids, flags.len())?;
        for (&id, &flag) in quest_ids.iter().zip(flags) {
            self.quests[id as usize].flags = flag;
        }
        Ok(())
    }

    /// Validate a submission batch without writing
    ///
    /// Fails on length mismatch, unknown ids, paused quests and quests the
    /// quester has already passed.
    pub fn check_submission(
        &self,
        quester: Address,
        quest_ids: &[QuestId],
        proofs: &[String],
    ) -> Result<()> {
        self.check_batch(quest_ids, proofs.len())?;
        let mut overlay: HashMap<QuestId, QuestStatus> = HashMap::new();
        for &id in quest_ids {
            let quest = &self.quests[id as usize];
            if quest.flags.paused {
                return Err(ConflictReason::QuestPaused.into());
            }
            let current = overlay
                .get(&id)
                .copied()
                .unwrap_or_else(|| self.status_unchecked(quester, id));
            if current.is_passed() {
                return Err(ConflictReason::AlreadyPassed.into());
            }
            overlay.insert(id, Self::submitted_status(quest));
        }
        Ok(())
    }

    /// Record a batch already accepted by [`check_submission`](Self::check_submission)
    pub fn apply_submission(&mut self, quester: Address, quest_ids: &[QuestId]) {
        for &id in quest_ids {
            let next = Self::submitted_status(&self.quests[id as usize]);
            self.status.insert((quester, id), next);
        }
    }

    fn submitted_status(quest: &Quest) -> QuestStatus {
        if quest.flags.skip_review {
            QuestStatus::Pass
        } else {
            QuestStatus::Review
        }
    }

    /// Settle pending submissions
    ///
    /// Every `(quester, quest)` entry must currently be in review.
    pub fn review(
        &mut self,
        questers: &[Address],
        quest_ids: &[QuestId],
        verdicts: &[bool],
        details: &[String],
    ) -> Result<()> {
        let len = questers.len();
        if quest_ids.len() != len || verdicts.len() != len || details.len() != len {
            return Err(InvalidReason::InvalidParams.into());
        }
        let mut settled: HashMap<(Address, QuestId), QuestStatus> = HashMap::new();
        for (&quester, (&id, &ok)) in questers.iter().zip(quest_ids.iter().zip(verdicts)) {
            self.quest(id)?;
            let current = settled
                .get(&(quester, id))
                .copied()
                .unwrap_or_else(|| self.status_unchecked(quester, id));
            if current != QuestStatus::Review {
                return Err(ConflictReason::NotInReview.into());
            }
            let verdict = if ok { QuestStatus::Pass } else { QuestStatus::Fail };
            settled.insert((quester, id), verdict);
        }
        self.status.extend(settled);
        Ok(())
    }

    /// Whether `quester` has completed the chain
    ///
    /// Every quest must be passed, optional or paused. A chain without
    /// quests cannot be completed.
    pub fn check_complete(&self, quester: Address) -> Result<()> {
        if self.quests.is_empty() {
            return Err(InvalidReason::NoQuests.into());
        }
        let complete = self
            .quests
            .iter()
            .enumerate()
            .all(|(id, quest)| {
                quest.is_waived() || self.status_unchecked(quester, id as QuestId).is_passed()
            });
        if complete {
            Ok(())
        } else {
            Err(ConflictReason::ChainIncomplete.into())
        }
    }

    fn check_batch(&self, quest_ids: &[QuestId], other_len: usize) -> Result<()> {
        if quest_ids.len() != other_len {
            return Err(InvalidReason::InvalidParams.into());
        }
        for &id in quest_ids {
            self.quest(id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use quest_core::QuestError;

    fn quester() -> Address {
        Address::derive(b"quester")
    }

    fn book(n: usize) -> QuestBook {
        let mut book = QuestBook::new();
        book.create((0..n).map(|i| format!("quest-{i}")).collect());
        book
    }

    fn proofs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("proof-{i}")).collect()
    }

    #[test]
    fn test_create_assigns_dense_ids() {
        let mut book = book(2);
        assert_eq!(book.create(vec!["c".into(), "d".into()]), 2);
        assert_eq!(book.count(), 4);
        assert_eq!(book.quest(3).unwrap().details, "d");
        assert_matches!(
            book.quest(4),
            Err(QuestError::Invalid(InvalidReason::QuestNotFound))
        );
    }

    #[test]
    fn test_submit_then_review_pass() {
        let mut book = book(1);
        book.check_submission(quester(), &[0], &proofs(1)).unwrap();
        book.apply_submission(quester(), &[0]);
        assert_eq!(book.status(quester(), 0).unwrap(), QuestStatus::Review);

        book.review(&[quester()], &[0], &[true], &["ok".into()]).unwrap();
        assert_eq!(book.status(quester(), 0).unwrap(), QuestStatus::Pass);
        assert_matches!(
            book.check_submission(quester(), &[0], &proofs(1)),
            Err(QuestError::Conflict(ConflictReason::AlreadyPassed))
        );
    }

    #[test]
    fn test_failed_quest_can_be_resubmitted() {
        let mut book = book(1);
        book.apply_submission(quester(), &[0]);
        book.review(&[quester()], &[0], &[false], &["no".into()]).unwrap();
        assert_eq!(book.status(quester(), 0).unwrap(), QuestStatus::Fail);
        assert!(book.check_submission(quester(), &[0], &proofs(1)).is_ok());
    }

    #[test]
    fn test_skip_review_passes_immediately() {
        let mut book = book(1);
        book.configure(&[0], &[QuestFlags::skip_review()]).unwrap();
        book.apply_submission(quester(), &[0]);
        assert_eq!(book.status(quester(), 0).unwrap(), QuestStatus::Pass);
    }

    #[test]
    fn test_duplicate_after_skip_review_in_one_batch_is_rejected() {
        let mut book = book(1);
        book.configure(&[0], &[QuestFlags::skip_review()]).unwrap();
        assert_matches!(
            book.check_submission(quester(), &[0, 0], &proofs(2)),
            Err(QuestError::Conflict(ConflictReason::AlreadyPassed))
        );
    }

    #[test]
    fn test_paused_quest_rejects_submission() {
        let mut book = book(2);
        book.configure(&[1], &[QuestFlags::paused()]).unwrap();
        assert_matches!(
            book.check_submission(quester(), &[0, 1], &proofs(2)),
            Err(QuestError::Conflict(ConflictReason::QuestPaused))
        );
    }

    #[test]
    fn test_length_mismatch_is_invalid() {
        let book = book(2);
        assert_matches!(
            book.check_submission(quester(), &[0, 1], &proofs(1)),
            Err(QuestError::Invalid(InvalidReason::InvalidParams))
        );
    }

    #[test]
    fn test_review_batch_is_all_or_nothing() {
        let mut book = book(2);
        book.apply_submission(quester(), &[0]);
        let err = book
            .review(
                &[quester(), quester()],
                &[0, 1],
                &[true, true],
                &["a".into(), "b".into()],
            )
            .unwrap_err();
        assert_matches!(err, QuestError::Conflict(ConflictReason::NotInReview));
        assert_eq!(book.status(quester(), 0).unwrap(), QuestStatus::Review);
    }

    #[test]
    fn test_double_review_in_one_batch_is_rejected() {
        let mut book = book(1);
        book.apply_submission(quester(), &[0]);
        assert_matches!(
            book.review(
                &[quester(), quester()],
                &[0, 0],
                &[true, false],
                &["a".into(), "b".into()],
            ),
            Err(QuestError::Conflict(ConflictReason::NotInReview))
        );
    }

    #[test]
    fn test_review_requires_equal_list_lengths() {
        let mut book = book(2);
        book.apply_submission(quester(), &[0, 1]);
        let q = quester();
        let cases: [(&[Address], &[QuestId], &[bool], Vec<String>); 4] = [
            (&[q], &[0, 1], &[true, true], proofs(2)),
            (&[q, q], &[0], &[true, true], proofs(2)),
            (&[q, q], &[0, 1], &[true], proofs(2)),
            (&[q, q], &[0, 1], &[true, true], proofs(1)),
        ];
        for (questers, ids, verdicts, details) in cases {
            assert_matches!(
                book.review(questers, ids, verdicts, &details),
                Err(QuestError::Invalid(InvalidReason::InvalidParams))
            );
        }
        assert_eq!(book.status(q, 0).unwrap(), QuestStatus::Review);
        assert_eq!(book.status(q, 1).unwrap(), QuestStatus::Review);
    }

    #[test]
    fn test_edit_requires_equal_list_lengths() {
        let mut book = book(2);
        assert_matches!(
            book.edit(&[0, 1], &["x".into()]),
            Err(QuestError::Invalid(InvalidReason::InvalidParams))
        );
        assert_eq!(book.quest(0).unwrap().details, "quest-0");
    }

    #[test]
    fn test_edit_rejects_unknown_id_without_writing() {
        let mut book = book(2);
        assert_matches!(
            book.edit(&[0, 9], &["x".into(), "y".into()]),
            Err(QuestError::Invalid(InvalidReason::QuestNotFound))
        );
        assert_eq!(book.quest(0).unwrap().details, "quest-0");
    }

    #[test]
    fn test_completion_honours_optional_and_paused() {
        let mut book = book(3);
        assert_matches!(
            book.check_complete(quester()),
            Err(QuestError::Conflict(ConflictReason::ChainIncomplete))
        );
        book.configure(&[1, 2], &[QuestFlags::optional(), QuestFlags::paused()])
            .unwrap();
        book.apply_submission(quester(), &[0]);
        book.review(&[quester()], &[0], &[true], &["ok".into()]).unwrap();
        assert!(book.check_complete(quester()).is_ok());
    }

    #[test]
    fn test_empty_book_cannot_complete() {
        assert_matches!(
            QuestBook::new().check_complete(quester()),
            Err(QuestError::Invalid(InvalidReason::NoQuests))
        );
    }
}
