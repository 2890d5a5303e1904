//! Grammar reference gate.
//!
//! One lesson unlocks the advanced grammar tables. This is a single predicate,
//! consulted by whatever renders the reference page.

use std::collections::BTreeSet;

use crate::model::LessonId;

/// Lesson whose completion unlocks the advanced grammar tables.
pub const GRAMMAR_GATE_LESSON: &str = "a1-m2-l4";

#[must_use]
pub fn gate_lesson() -> LessonId {
    LessonId::new(GRAMMAR_GATE_LESSON)
}

#[must_use]
pub fn advanced_content_unlocked(completed: &BTreeSet<LessonId>) -> bool {
    completed.contains(&gate_lesson())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAccess {
    Available,
    Locked,
}

impl TableAccess {
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

/// Reference tables on the grammar page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarTable {
    PersonalPronouns,
    PastTenseConjugation,
    PresentTenseConjugation,
    NounCases,
    DemonstrativePronouns,
    NumbersAndCounting,
}

impl GrammarTable {
    pub const ALL: [GrammarTable; 6] = [
        GrammarTable::PersonalPronouns,
        GrammarTable::PastTenseConjugation,
        GrammarTable::PresentTenseConjugation,
        GrammarTable::NounCases,
        GrammarTable::DemonstrativePronouns,
        GrammarTable::NumbersAndCounting,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::PersonalPronouns => "Personal Pronouns",
            Self::PastTenseConjugation => "Past Tense Conjugation",
            Self::PresentTenseConjugation => "Present Tense Conjugation",
            Self::NounCases => "Noun Cases",
            Self::DemonstrativePronouns => "Demonstrative Pronouns",
            Self::NumbersAndCounting => "Numbers and Counting",
        }
    }

    #[must_use]
    pub fn always_available(self) -> bool {
        matches!(self, Self::PersonalPronouns)
    }

    #[must_use]
    pub fn access(self, advanced_unlocked: bool) -> TableAccess {
        if advanced_unlocked || self.always_available() {
            TableAccess::Available
        } else {
            TableAccess::Locked
        }
    }
}
