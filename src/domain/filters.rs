use super::customer::{PersonType, RiskClass, MAX_SCORE};

const SCORE_STEP: u16 = 50;

/// Inclusive score bounds, always `min <= max` within `0..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRange {
    min: u16,
    max: u16,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: MAX_SCORE,
        }
    }
}

impl ScoreRange {
    /// Returns `None` when the bounds are inverted or out of range.
    pub fn new(min: u16, max: u16) -> Option<Self> {
        (min <= max && max <= MAX_SCORE).then_some(Self { min, max })
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    pub fn contains(&self, score: u16) -> bool {
        (self.min..=self.max).contains(&score)
    }

    pub fn min_is_set(&self) -> bool {
        self.min != 0
    }

    pub fn max_is_set(&self) -> bool {
        self.max != MAX_SCORE
    }

    pub fn is_full(&self) -> bool {
        !self.min_is_set() && !self.max_is_set()
    }

    /// Moves the lower bound, refusing to cross the upper bound.
    pub fn shift_min(&mut self, up: bool) {
        self.min = if up {
            self.min.saturating_add(SCORE_STEP).min(self.max)
        } else {
            self.min.saturating_sub(SCORE_STEP)
        };
    }

    /// Moves the upper bound, refusing to cross the lower bound.
    pub fn shift_max(&mut self, up: bool) {
        self.max = if up {
            self.max.saturating_add(SCORE_STEP).min(MAX_SCORE)
        } else {
            self.max.saturating_sub(SCORE_STEP).max(self.min)
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersonTypeFilter {
    #[default]
    All,
    Only(PersonType),
}

impl PersonTypeFilter {
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Only(PersonType::Individual),
            Self::Only(PersonType::Individual) => Self::Only(PersonType::Business),
            Self::Only(PersonType::Business) => Self::All,
        }
    }

    pub fn matches(self, person_type: PersonType) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == person_type,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::Only(person_type) => person_type.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RiskClassFilter {
    #[default]
    All,
    Only(RiskClass),
}

impl RiskClassFilter {
    pub fn cycle(&self) -> Self {
        match self {
            Self::All => Self::Only(RiskClass::Low),
            Self::Only(RiskClass::Low) => Self::Only(RiskClass::Medium),
            Self::Only(RiskClass::Medium) => Self::Only(RiskClass::High),
            Self::Only(_) => Self::All,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "Todas",
            Self::Only(class) => class.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl ActiveFilter {
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Inactive,
            Self::Inactive => Self::All,
        }
    }

    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(true),
            Self::Inactive => Some(false),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::Active => "Ativos",
            Self::Inactive => "Inativos",
        }
    }
}

/// Server-side filter criteria for the customer list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerFilters {
    pub search: String,
    pub score: ScoreRange,
    pub person_type: PersonTypeFilter,
    pub risk_class: RiskClassFilter,
    pub active: ActiveFilter,
}

impl CustomerFilters {
    /// Search text as it should be sent, or `None` when blank.
    pub fn effective_search(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn has_active_filters(&self) -> bool {
        self.effective_search().is_some()
            || !self.score.is_full()
            || self.person_type != PersonTypeFilter::All
            || self.risk_class != RiskClassFilter::All
            || self.active != ActiveFilter::All
    }
}
