use rand::Rng;
use rand::seq::SliceRandom;

/// A single multiple-choice question.
///
/// `correct` always indexes into `options`, and `options` holds at least two
/// entries. The loader enforces both before a `Question` is handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub category: String,
}

impl Question {
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct)
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// Permute the options uniformly and move `correct` along with the
    /// originally correct text.
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.options.len()).collect();
        order.shuffle(rng);

        let mut previous: Vec<Option<String>> = self.options.drain(..).map(Some).collect();
        self.options = order
            .iter()
            .filter_map(|&from| previous[from].take())
            .collect();
        self.correct = order
            .iter()
            .position(|&from| from == self.correct)
            .unwrap_or(self.correct);
    }
}

/// A category listed in the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question() -> Question {
        Question {
            prompt: "Which is a sunk cost?".to_string(),
            options: vec![
                "Future rent".to_string(),
                "Last year's R&D".to_string(),
                "Next month's payroll".to_string(),
                "Planned marketing".to_string(),
            ],
            correct: 1,
            category: "costs".to_string(),
        }
    }

    #[test]
    fn test_is_correct() {
        let q = question();
        assert!(q.is_correct(Some(1)));
        assert!(!q.is_correct(Some(0)));
        assert!(!q.is_correct(None));
    }

    #[test]
    fn test_shuffle_keeps_correct_text() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut q = question();
            let before = q.correct_option().to_string();
            q.shuffle_options(&mut rng);
            assert_eq!(q.correct_option(), before);
            assert_eq!(q.options.len(), 4);
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = question();
        q.shuffle_options(&mut rng);

        let mut shuffled = q.options.clone();
        let mut original = question().options;
        shuffled.sort();
        original.sort();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn test_shuffle_with_duplicate_text() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut q = Question {
            prompt: "Pick the second".to_string(),
            options: vec!["same".to_string(), "same".to_string(), "other".to_string()],
            correct: 1,
            category: "misc".to_string(),
        };
        q.shuffle_options(&mut rng);
        assert_eq!(q.correct_option(), "same");
        assert!(q.correct < 3);
    }
}
