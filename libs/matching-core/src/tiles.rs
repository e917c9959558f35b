//! Turns a deck sample into the two columns of tiles.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::sampler::Sample;
use crate::types::Tile;

/// Line-break token used when the renderer does not ask for another one.
pub const DEFAULT_LINE_BREAK: &str = "<br>";

const QUESTION_PREFIX: &str = "front-";
const ANSWER_PREFIX: &str = "back-";
const DISTRACTOR_PREFIX: &str = "front-extra-";

/// Question and answer columns, each independently shuffled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    pub questions: Vec<Tile>,
    pub answers: Vec<Tile>,
}

#[derive(Debug, Clone)]
pub struct TileSetBuilder {
    line_break: String,
}

impl Default for TileSetBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_BREAK)
    }
}

impl TileSetBuilder {
    pub fn new(line_break: impl Into<String>) -> Self {
        Self {
            line_break: line_break.into(),
        }
    }

    /// Build both columns from a sample.
    ///
    /// Matching card `i` yields question `front-i` linked to answer `back-i`.
    /// Distractor `j` yields question `front-extra-j` with no link.
    pub fn build<R: Rng + ?Sized>(&self, sample: &Sample, rng: &mut R) -> TileSet {
        let mut questions = Vec::with_capacity(sample.matching.len() + sample.distractors.len());
        let mut answers = Vec::with_capacity(sample.matching.len());

        for (index, card) in sample.matching.iter().enumerate() {
            let answer_id = format!("{ANSWER_PREFIX}{index}");
            questions.push(Tile::question(
                format!("{QUESTION_PREFIX}{index}"),
                card.question.clone(),
                Some(answer_id.clone()),
            ));
            answers.push(Tile::answer(answer_id, self.normalize(&card.answer)));
        }

        for (index, card) in sample.distractors.iter().enumerate() {
            questions.push(Tile::question(
                format!("{DISTRACTOR_PREFIX}{index}"),
                card.question.clone(),
                None,
            ));
        }

        // Two separate shuffles so column order says nothing about pairing.
        questions.shuffle(rng);
        answers.shuffle(rng);

        TileSet { questions, answers }
    }

    fn normalize(&self, content: &str) -> String {
        content.replace('\n', &self.line_break)
    }
}
