/// On-disk characters for each label.
pub const GOOD_CHAR: char = 'g';
pub const BAD_CHAR: char = 'b';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipLabel {
    Good,
    Bad,
}

impl ChipLabel {
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            ChipLabel::Good => GOOD_CHAR,
            ChipLabel::Bad => BAD_CHAR,
        }
    }

    /// Strict decode: anything but `g`/`b` is `None`.
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            GOOD_CHAR => Some(ChipLabel::Good),
            BAD_CHAR => Some(ChipLabel::Bad),
            _ => None,
        }
    }

    #[inline]
    pub fn is_bad(self) -> bool {
        self == ChipLabel::Bad
    }
}

/// Ordered chip labels of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    labels: Vec<ChipLabel>,
}

impl Batch {
    pub fn new(labels: Vec<ChipLabel>) -> Self {
        Self { labels }
    }

    pub fn all_good(size: usize) -> Self {
        Self {
            labels: vec![ChipLabel::Good; size],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn label(&self, index: usize) -> ChipLabel {
        self.labels[index]
    }

    pub fn labels(&self) -> &[ChipLabel] {
        &self.labels
    }

    pub fn defect_count(&self) -> u32 {
        self.labels.iter().filter(|l| l.is_bad()).count() as u32
    }

    /// A batch is defective only if it actually holds a bad chip.
    pub fn is_defective(&self) -> bool {
        self.labels.iter().any(|l| l.is_bad())
    }
}
